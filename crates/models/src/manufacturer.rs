use std::fmt;

use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FieldErrors, ModelError};
use crate::{car, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "manufacturer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Car,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Car => Entity::has_many(car::Entity).into() }
    }
}

impl Related<car::Entity> for Entity {
    fn to() -> RelationDef { Relation::Car.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.country)
    }
}

pub fn validate(name: &str, country: &str) -> Result<(), ModelError> {
    let mut errors = FieldErrors::new();
    validation::required(&mut errors, "name", name, 255);
    validation::required(&mut errors, "country", country, 255);
    errors.into_result()
}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str, country: &str) -> Result<Model, ModelError> {
    validate(name, country)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        country: Set(country.trim().to_string()),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, id: Uuid, name: &str, country: &str) -> Result<Option<Model>, ModelError> {
    let Some(found) = Entity::find_by_id(id).one(db).await? else { return Ok(None) };
    validate(name, country)?;
    let mut am: ActiveModel = found.into();
    am.name = Set(name.trim().to_string());
    am.country = Set(country.trim().to_string());
    Ok(Some(am.update(db).await?))
}

/// Returns whether a row was removed. Cars of the manufacturer go with it.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
