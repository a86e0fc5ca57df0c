pub mod errors;
pub mod db;
pub mod validation;
pub mod manufacturer;
pub mod driver;
pub mod driver_credentials;
pub mod car;
pub mod car_driver;
pub mod session;

#[cfg(test)]
mod tests;
