use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::errors::FieldErrors;
use models::{car, driver, manufacturer, validation};
use crate::errors::ServiceError;
use crate::search::{self, ListPage, ListQuery, SearchList};

/// Cars searched by model.
pub struct CarList;

impl SearchList for CarList {
    type Entity = car::Entity;

    fn search_column() -> car::Column { car::Column::Model }

    fn ordering() -> Vec<car::Column> { vec![car::Column::Model, car::Column::Id] }
}

/// A car with its manufacturer joined in.
#[derive(Debug, Clone, Serialize)]
pub struct CarRow {
    #[serde(flatten)]
    pub car: car::Model,
    pub manufacturer: Option<manufacturer::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarDetail {
    #[serde(flatten)]
    pub car: car::Model,
    pub manufacturer: Option<manufacturer::Model>,
    pub drivers: Vec<driver::Model>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarInput {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub manufacturer_id: Option<Uuid>,
    /// `None` keeps the current drivers on update and means "no drivers" on create.
    #[serde(default)]
    pub drivers: Option<Vec<Uuid>>,
}

impl CarInput {
    /// The manufacturer id, or the complete set of form errors when it is missing.
    async fn manufacturer<C: ConnectionTrait>(&self, db: &C) -> Result<Uuid, ServiceError> {
        match self.manufacturer_id {
            Some(id) => Ok(id),
            None => {
                car::validate(db, &self.model, None, self.drivers.as_deref().unwrap_or_default()).await?;
                Err(ServiceError::Validation(FieldErrors::single("manufacturer", validation::REQUIRED)))
            }
        }
    }
}

pub async fn list_cars(db: &DatabaseConnection, query: &ListQuery) -> Result<ListPage<CarRow>, ServiceError> {
    let select = CarList::select(query).find_also_related(manufacturer::Entity);
    let page = search::fetch_page(db, select, query).await?;
    Ok(page.map(|(car, manufacturer)| CarRow { car, manufacturer }))
}

pub async fn get_car(db: &DatabaseConnection, id: Uuid) -> Result<CarDetail, ServiceError> {
    let (car, manufacturer) = car::Entity::find_by_id(id)
        .find_also_related(manufacturer::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("car"))?;
    let drivers = car
        .find_related(driver::Entity)
        .order_by_asc(driver::Column::Username)
        .all(db)
        .await?;
    Ok(CarDetail { car, manufacturer, drivers })
}

#[instrument(skip(db, input), fields(model = %input.model))]
pub async fn create_car(db: &DatabaseConnection, input: CarInput) -> Result<CarDetail, ServiceError> {
    let manufacturer_id = input.manufacturer(db).await?;
    let drivers = input.drivers.unwrap_or_default();
    let txn = db.begin().await?;
    let created = car::create(&txn, &input.model, manufacturer_id, &drivers).await?;
    txn.commit().await?;
    info!(car_id = %created.id, drivers = drivers.len(), "car_created");
    get_car(db, created.id).await
}

#[instrument(skip(db, input))]
pub async fn update_car(db: &DatabaseConnection, id: Uuid, input: CarInput) -> Result<CarDetail, ServiceError> {
    if car::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("car"));
    }
    let manufacturer_id = input.manufacturer(db).await?;
    let txn = db.begin().await?;
    let updated = car::update(&txn, id, &input.model, manufacturer_id, input.drivers.as_deref()).await?;
    if updated.is_none() {
        txn.rollback().await?;
        return Err(ServiceError::not_found("car"));
    }
    txn.commit().await?;
    get_car(db, id).await
}

#[instrument(skip(db))]
pub async fn delete_car(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if !car::delete(db, id).await? {
        return Err(ServiceError::not_found("car"));
    }
    info!(car_id = %id, "car_deleted");
    Ok(())
}
