//! Create a driver with a password from the command line, so the first login is possible.
//!
//! Usage: `create_driver <username> <password> <license_number> [first_name] [last_name]`

use anyhow::{anyhow, Context};
use service::driver_service::{self, DriverCreateForm};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let mut args = std::env::args().skip(1);
    let usage = "usage: create_driver <username> <password> <license_number> [first_name] [last_name]";
    let username = args.next().ok_or_else(|| anyhow!(usage))?;
    let password = args.next().ok_or_else(|| anyhow!(usage))?;
    let license_number = args.next().ok_or_else(|| anyhow!(usage))?;
    let first_name = args.next().unwrap_or_default();
    let last_name = args.next().unwrap_or_default();

    let cfg = configs::AppConfig::load_or_env().context("loading configuration")?;
    let db = models::db::connect_and_migrate(&cfg.database).await?;

    let form = DriverCreateForm {
        username,
        password1: password.clone(),
        password2: password,
        license_number,
        first_name,
        last_name,
        email: String::new(),
    };
    let created = driver_service::create_driver(&db, form)
        .await
        .map_err(|e| anyhow!("could not create driver: {e}"))?;
    info!(driver_id = %created.driver.id, url = %created.url, "driver created");
    println!("{}", created.display);
    Ok(())
}
