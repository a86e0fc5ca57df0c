//! Join table behind `car.drivers` / `driver.cars`.

use std::collections::BTreeSet;

use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{car, driver};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car_driver")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub car_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub driver_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Car,
    Driver,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Car => Entity::belongs_to(car::Entity)
                .from(Column::CarId)
                .to(car::Column::Id)
                .into(),
            Relation::Driver => Entity::belongs_to(driver::Entity)
                .from(Column::DriverId)
                .to(driver::Column::Id)
                .into(),
        }
    }
}

impl Related<car::Entity> for Entity {
    fn to() -> RelationDef { Relation::Car.def() }
}

impl Related<driver::Entity> for Entity {
    fn to() -> RelationDef { Relation::Driver.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn is_assigned<C: ConnectionTrait>(db: &C, car_id: Uuid, driver_id: Uuid) -> Result<bool, ModelError> {
    Ok(Entity::find_by_id((car_id, driver_id)).one(db).await?.is_some())
}

pub async fn assign<C: ConnectionTrait>(db: &C, car_id: Uuid, driver_id: Uuid) -> Result<(), ModelError> {
    let am = ActiveModel { car_id: Set(car_id), driver_id: Set(driver_id) };
    Entity::insert(am).exec_without_returning(db).await?;
    Ok(())
}

/// Returns whether a membership existed.
pub async fn unassign<C: ConnectionTrait>(db: &C, car_id: Uuid, driver_id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id((car_id, driver_id)).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn driver_ids_of_car<C: ConnectionTrait>(db: &C, car_id: Uuid) -> Result<Vec<Uuid>, ModelError> {
    let rows = Entity::find().filter(Column::CarId.eq(car_id)).all(db).await?;
    Ok(rows.into_iter().map(|r| r.driver_id).collect())
}

/// Make the car's driver set exactly `driver_ids` (duplicates collapse).
pub async fn replace_drivers<C: ConnectionTrait>(db: &C, car_id: Uuid, driver_ids: &[Uuid]) -> Result<(), ModelError> {
    Entity::delete_many().filter(Column::CarId.eq(car_id)).exec(db).await?;
    let unique: BTreeSet<Uuid> = driver_ids.iter().copied().collect();
    if unique.is_empty() {
        return Ok(());
    }
    let rows = unique
        .into_iter()
        .map(|driver_id| ActiveModel { car_id: Set(car_id), driver_id: Set(driver_id) });
    Entity::insert_many(rows).exec_without_returning(db).await?;
    Ok(())
}
