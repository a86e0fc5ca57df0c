//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod search;
pub mod manufacturer_service;
pub mod car_service;
pub mod driver_service;
pub mod assignment;
pub mod dashboard;
pub mod auth;
#[cfg(test)]
pub mod test_support;
