use std::fmt;

use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FieldErrors, ModelError};
use crate::{car, car_driver, driver_credentials, session, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "driver")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[sea_orm(unique)]
    pub license_number: Option<String>,
    pub is_staff: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Credentials,
    Session,
    CarDriver,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Credentials => Entity::has_one(driver_credentials::Entity).into(),
            Relation::Session => Entity::has_many(session::Entity).into(),
            Relation::CarDriver => Entity::has_many(car_driver::Entity).into(),
        }
    }
}

impl Related<car::Entity> for Entity {
    fn to() -> RelationDef { car_driver::Relation::Car.def() }
    fn via() -> Option<RelationDef> { Some(car_driver::Relation::Driver.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.username, self.first_name, self.last_name)
    }
}

impl Model {
    pub fn absolute_url(&self) -> String { format!("/drivers/{}", self.id) }
}

/// Fields for a new driver row. Passwords are handled by `driver_credentials`.
#[derive(Clone, Debug, Default)]
pub struct NewDriver {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub license_number: Option<String>,
    pub is_staff: bool,
}

/// Collect license errors under `license_number`.
pub fn validate_license(errors: &mut FieldErrors, license_number: &str) {
    if let Err(msg) = validation::license_number(license_number) {
        errors.add("license_number", msg);
    }
}

pub fn validate(input: &NewDriver) -> Result<(), ModelError> {
    let mut errors = FieldErrors::new();
    validation::required(&mut errors, "username", &input.username, 150);
    if input.username.chars().any(char::is_whitespace) {
        errors.add("username", "Enter a valid username without spaces.");
    }
    if let Some(license) = &input.license_number {
        validate_license(&mut errors, license);
    }
    errors.into_result()
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Username.eq(username)).one(db).await?)
}

pub async fn find_by_license<C: ConnectionTrait>(db: &C, license_number: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::LicenseNumber.eq(license_number)).one(db).await?)
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewDriver) -> Result<Model, ModelError> {
    validate(&input)?;
    let mut conflicts = FieldErrors::new();
    if find_by_username(db, &input.username).await?.is_some() {
        conflicts.add("username", "A user with that username already exists.");
    }
    if let Some(license) = &input.license_number {
        if find_by_license(db, license).await?.is_some() {
            conflicts.add("license_number", "Driver with this license number already exists.");
        }
    }
    if !conflicts.is_empty() {
        return Err(ModelError::Conflict(conflicts));
    }

    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(input.username),
        first_name: Set(input.first_name.trim().to_string()),
        last_name: Set(input.last_name.trim().to_string()),
        email: Set(input.email.trim().to_string()),
        license_number: Set(input.license_number),
        is_staff: Set(input.is_staff),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// Replace the license number of an existing driver.
pub async fn update_license<C: ConnectionTrait>(db: &C, id: Uuid, license_number: &str) -> Result<Option<Model>, ModelError> {
    let Some(found) = Entity::find_by_id(id).one(db).await? else { return Ok(None) };
    let mut errors = FieldErrors::new();
    validate_license(&mut errors, license_number);
    errors.into_result()?;

    if let Some(other) = find_by_license(db, license_number).await? {
        if other.id != id {
            return Err(ModelError::Conflict(FieldErrors::single(
                "license_number",
                "Driver with this license number already exists.",
            )));
        }
    }
    let mut am: ActiveModel = found.into();
    am.license_number = Set(Some(license_number.to_string()));
    am.updated_at = Set(Utc::now().into());
    Ok(Some(am.update(db).await?))
}

/// Returns whether a row was removed. Credentials, sessions and assignments go with it.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
