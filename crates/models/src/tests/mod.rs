

/// Transaction handling and cascade tests
pub mod transaction_tests;

/// Shared fixtures
pub(crate) mod fixtures {
    use crate::{driver, manufacturer};
    use anyhow::Result;
    use sea_orm::DatabaseConnection;

    pub async fn manufacturer(db: &DatabaseConnection, name: &str) -> Result<manufacturer::Model> {
        Ok(manufacturer::create(db, name, "Japan").await?)
    }

    pub async fn driver(db: &DatabaseConnection, username: &str, license: Option<&str>) -> Result<driver::Model> {
        let input = driver::NewDriver {
            username: username.to_string(),
            first_name: "Test".into(),
            last_name: "Driver".into(),
            license_number: license.map(str::to_string),
            ..Default::default()
        };
        Ok(driver::create(db, input).await?)
    }
}
