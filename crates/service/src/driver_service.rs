use sea_orm::{DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::errors::{FieldErrors, ModelError};
use models::{car, driver, driver_credentials, manufacturer, validation};
use crate::auth::password;
use crate::car_service::CarRow;
use crate::errors::ServiceError;
use crate::search::{self, ListPage, ListQuery, SearchList};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Drivers searched by username.
pub struct DriverList;

impl SearchList for DriverList {
    type Entity = driver::Entity;

    fn search_column() -> driver::Column { driver::Column::Username }

    fn ordering() -> Vec<driver::Column> { vec![driver::Column::Username, driver::Column::Id] }
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverDetail {
    #[serde(flatten)]
    pub driver: driver::Model,
    pub display: String,
    pub url: String,
    pub cars: Vec<CarRow>,
}

/// Driver sign-up form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverCreateForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LicenseUpdateForm {
    #[serde(default)]
    pub license_number: String,
}

impl DriverCreateForm {
    fn new_driver(&self) -> driver::NewDriver {
        let license = self.license_number.trim();
        driver::NewDriver {
            username: self.username.trim().to_string(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            license_number: (!license.is_empty()).then(|| license.to_string()),
            is_staff: false,
        }
    }

    /// Every field problem at once, the way a form reports them.
    fn validate(&self, new: &driver::NewDriver) -> Result<(), ServiceError> {
        let mut errors = match driver::validate(new) {
            Ok(()) => FieldErrors::new(),
            Err(ModelError::Validation(e)) => e,
            Err(e) => return Err(e.into()),
        };
        if new.license_number.is_none() {
            errors.add("license_number", validation::REQUIRED);
        }
        if self.password1.is_empty() {
            errors.add("password1", validation::REQUIRED);
        } else if self.password1.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password1", "This password is too short. It must contain at least 8 characters.");
        }
        if self.password2.is_empty() {
            errors.add("password2", validation::REQUIRED);
        } else if !self.password1.is_empty() && self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }
        if errors.is_empty() { Ok(()) } else { Err(ServiceError::Validation(errors)) }
    }
}

pub async fn list_drivers(db: &DatabaseConnection, query: &ListQuery) -> Result<ListPage<driver::Model>, ServiceError> {
    search::list::<DriverList, _>(db, query).await
}

/// The driver with every car they drive, manufacturers joined.
pub async fn get_driver(db: &DatabaseConnection, id: Uuid) -> Result<DriverDetail, ServiceError> {
    let found = driver::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("driver"))?;
    let cars = found
        .find_related(car::Entity)
        .find_also_related(manufacturer::Entity)
        .order_by_asc(car::Column::Model)
        .all(db)
        .await?
        .into_iter()
        .map(|(car, manufacturer)| CarRow { car, manufacturer })
        .collect();
    Ok(DriverDetail { display: found.to_string(), url: found.absolute_url(), driver: found, cars })
}

#[instrument(skip(db, form), fields(username = %form.username))]
pub async fn create_driver(db: &DatabaseConnection, form: DriverCreateForm) -> Result<DriverDetail, ServiceError> {
    let new = form.new_driver();
    form.validate(&new)?;
    let hash = password::hash_password(&form.password1).map_err(|e| ServiceError::Internal(e.to_string()))?;

    let txn = db.begin().await?;
    let created = driver::create(&txn, new).await?;
    driver_credentials::upsert_password(&txn, created.id, hash, password::ALGORITHM).await?;
    txn.commit().await?;

    info!(driver_id = %created.id, "driver_created");
    get_driver(db, created.id).await
}

#[instrument(skip(db, form))]
pub async fn update_license(db: &DatabaseConnection, id: Uuid, form: LicenseUpdateForm) -> Result<DriverDetail, ServiceError> {
    if driver::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("driver"));
    }
    let license = form.license_number.trim();
    if license.is_empty() {
        return Err(ServiceError::Validation(FieldErrors::single("license_number", validation::REQUIRED)));
    }
    driver::update_license(db, id, license)
        .await?
        .ok_or_else(|| ServiceError::not_found("driver"))?;
    info!(driver_id = %id, "driver_license_updated");
    get_driver(db, id).await
}

/// Removes the driver, their sessions and their car assignments. Cars stay.
#[instrument(skip(db))]
pub async fn delete_driver(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if !driver::delete(db, id).await? {
        return Err(ServiceError::not_found("driver"));
    }
    info!(driver_id = %id, "driver_deleted");
    Ok(())
}
