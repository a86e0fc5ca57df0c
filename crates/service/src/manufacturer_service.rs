use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::manufacturer;
use crate::errors::ServiceError;
use crate::search::{self, ListPage, ListQuery, SearchList};

/// Manufacturers searched by name.
pub struct ManufacturerList;

impl SearchList for ManufacturerList {
    type Entity = manufacturer::Entity;

    fn search_column() -> manufacturer::Column { manufacturer::Column::Name }

    fn ordering() -> Vec<manufacturer::Column> {
        vec![manufacturer::Column::Name, manufacturer::Column::Id]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManufacturerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
}

pub async fn list_manufacturers(db: &DatabaseConnection, query: &ListQuery) -> Result<ListPage<manufacturer::Model>, ServiceError> {
    search::list::<ManufacturerList, _>(db, query).await
}

pub async fn get_manufacturer(db: &DatabaseConnection, id: Uuid) -> Result<manufacturer::Model, ServiceError> {
    manufacturer::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("manufacturer"))
}

#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_manufacturer(db: &DatabaseConnection, input: ManufacturerInput) -> Result<manufacturer::Model, ServiceError> {
    let created = manufacturer::create(db, &input.name, &input.country).await?;
    info!(manufacturer_id = %created.id, "manufacturer_created");
    Ok(created)
}

#[instrument(skip(db, input))]
pub async fn update_manufacturer(db: &DatabaseConnection, id: Uuid, input: ManufacturerInput) -> Result<manufacturer::Model, ServiceError> {
    manufacturer::update(db, id, &input.name, &input.country)
        .await?
        .ok_or_else(|| ServiceError::not_found("manufacturer"))
}

/// Removes the manufacturer and, through the FK cascade, its cars.
#[instrument(skip(db))]
pub async fn delete_manufacturer(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if !manufacturer::delete(db, id).await? {
        return Err(ServiceError::not_found("manufacturer"));
    }
    info!(manufacturer_id = %id, "manufacturer_deleted");
    Ok(())
}
