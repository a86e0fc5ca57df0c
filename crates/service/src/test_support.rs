#![cfg(test)]
use sea_orm::DatabaseConnection;

use models::{driver, manufacturer};

/// Fresh in-memory database with the schema applied; nothing is shared between tests.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_ephemeral().await
}

pub async fn seed_manufacturer(db: &DatabaseConnection, name: &str) -> Result<manufacturer::Model, anyhow::Error> {
    Ok(manufacturer::create(db, name, "Japan").await?)
}

/// Driver without credentials; enough for anything but login.
pub async fn seed_driver(db: &DatabaseConnection, username: &str) -> Result<driver::Model, anyhow::Error> {
    let input = driver::NewDriver { username: username.into(), ..Default::default() };
    Ok(driver::create(db, input).await?)
}
