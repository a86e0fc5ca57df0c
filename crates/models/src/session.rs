//! Server-side session rows: one per login, holding a JSON object of key/value state.

use chrono::{Duration, Utc};
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::driver;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub driver_id: Uuid,
    pub data: Json,
    pub created_at: DateTimeWithTimeZone,
    pub expires_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Driver }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Driver => Entity::belongs_to(driver::Entity)
                .from(Column::DriverId)
                .to(driver::Column::Id)
                .into(),
        }
    }
}

impl Related<driver::Entity> for Entity {
    fn to() -> RelationDef { Relation::Driver.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_expired(&self) -> bool { self.expires_at.with_timezone(&Utc) <= Utc::now() }

    pub fn get(&self, key: &str) -> Option<&Value> { self.data.get(key) }
}

pub async fn create<C: ConnectionTrait>(db: &C, driver_id: Uuid, ttl: Duration) -> Result<Model, ModelError> {
    let now = Utc::now();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        driver_id: Set(driver_id),
        data: Set(Value::Object(Map::new())),
        created_at: Set(now.into()),
        expires_at: Set((now + ttl).into()),
    };
    Ok(am.insert(db).await?)
}

/// The session if it exists and has not expired.
pub async fn find_active<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    let found = Entity::find_by_id(id).one(db).await?;
    Ok(found.filter(|s| !s.is_expired()))
}

/// Write one key of the session data, keeping the others.
pub async fn set_value<C: ConnectionTrait>(db: &C, id: Uuid, key: &str, value: Value) -> Result<Option<Model>, ModelError> {
    let Some(found) = Entity::find_by_id(id).one(db).await? else { return Ok(None) };
    let mut data = match found.data.clone() {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    data.insert(key.to_string(), value);
    let mut am: ActiveModel = found.into();
    am.data = Set(Value::Object(data));
    Ok(Some(am.update(db).await?))
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Drop every expired session; returns how many went.
pub async fn purge_expired<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::delete_many().filter(Column::ExpiresAt.lte(now)).exec(db).await?;
    Ok(res.rows_affected)
}
