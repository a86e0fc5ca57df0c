//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Driver login, server-side sessions and the signed token that points at them.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
