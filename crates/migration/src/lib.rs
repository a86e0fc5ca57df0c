//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_manufacturer;
mod m20240301_000002_create_driver;
mod m20240301_000003_create_driver_credentials;
mod m20240301_000004_create_car;
mod m20240301_000005_create_car_driver;
mod m20240301_000006_create_session;
mod m20240301_000007_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_manufacturer::Migration),
            Box::new(m20240301_000002_create_driver::Migration),
            Box::new(m20240301_000003_create_driver_credentials::Migration),
            Box::new(m20240301_000004_create_car::Migration),
            Box::new(m20240301_000005_create_car_driver::Migration),
            Box::new(m20240301_000006_create_session::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000007_add_indexes::Migration),
        ]
    }
}
