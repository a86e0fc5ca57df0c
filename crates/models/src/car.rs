use std::fmt;

use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FieldErrors, ModelError};
use crate::{car_driver, driver, manufacturer, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub model: String,
    pub manufacturer_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Manufacturer,
    CarDriver,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Manufacturer => Entity::belongs_to(manufacturer::Entity)
                .from(Column::ManufacturerId)
                .to(manufacturer::Column::Id)
                .into(),
            Relation::CarDriver => Entity::has_many(car_driver::Entity).into(),
        }
    }
}

impl Related<manufacturer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Manufacturer.def() }
}

impl Related<driver::Entity> for Entity {
    fn to() -> RelationDef { car_driver::Relation::Driver.def() }
    fn via() -> Option<RelationDef> { Some(car_driver::Relation::Car.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.model)
    }
}

/// Validate the form fields and check the referenced rows exist.
/// A `None` manufacturer is reported as a required field next to every other error.
pub async fn validate<C: ConnectionTrait>(
    db: &C,
    model: &str,
    manufacturer_id: Option<Uuid>,
    driver_ids: &[Uuid],
) -> Result<(), ModelError> {
    let mut errors = FieldErrors::new();
    validation::required(&mut errors, "model", model, 255);
    match manufacturer_id {
        Some(id) => {
            if manufacturer::Entity::find_by_id(id).one(db).await?.is_none() {
                errors.add("manufacturer", "Select a valid choice. That choice is not one of the available choices.");
            }
        }
        None => errors.add("manufacturer", validation::REQUIRED),
    }
    for id in driver_ids {
        if driver::Entity::find_by_id(*id).one(db).await?.is_none() {
            errors.add("drivers", format!("Select a valid choice. {id} is not one of the available choices."));
        }
    }
    errors.into_result()
}

/// Create a car and, when given, its initial driver set.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    model: &str,
    manufacturer_id: Uuid,
    driver_ids: &[Uuid],
) -> Result<Model, ModelError> {
    validate(db, model, Some(manufacturer_id), driver_ids).await?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        model: Set(model.trim().to_string()),
        manufacturer_id: Set(manufacturer_id),
        created_at: Set(Utc::now().into()),
    };
    let created = am.insert(db).await?;
    car_driver::replace_drivers(db, created.id, driver_ids).await?;
    Ok(created)
}

/// Update fields; `driver_ids` of `None` leaves the assignment untouched.
/// A missing car is `Ok(None)` whatever the input looks like.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    model: &str,
    manufacturer_id: Uuid,
    driver_ids: Option<&[Uuid]>,
) -> Result<Option<Model>, ModelError> {
    let Some(found) = Entity::find_by_id(id).one(db).await? else { return Ok(None) };
    validate(db, model, Some(manufacturer_id), driver_ids.unwrap_or_default()).await?;
    let mut am: ActiveModel = found.into();
    am.model = Set(model.trim().to_string());
    am.manufacturer_id = Set(manufacturer_id);
    let updated = am.update(db).await?;
    if let Some(ids) = driver_ids {
        car_driver::replace_drivers(db, id, ids).await?;
    }
    Ok(Some(updated))
}

/// Returns whether a row was removed. Only the car's join rows go with it.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
