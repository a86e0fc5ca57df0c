use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QuerySelect, TransactionTrait};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use uuid::Uuid;

use models::{car, driver, manufacturer, session};
use crate::errors::ServiceError;

/// Session key holding the visit counter.
pub const VISITS_KEY: &str = "num_visits";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub num_drivers: u64,
    pub num_cars: u64,
    pub num_manufacturers: u64,
    pub num_visits: u64,
}

/// Live counts plus this session's visit number, counting the current visit.
#[instrument(skip(db))]
pub async fn snapshot(db: &DatabaseConnection, session_id: Uuid) -> Result<DashboardSnapshot, ServiceError> {
    let num_drivers = driver::Entity::find().count(db).await?;
    let num_cars = car::Entity::find().count(db).await?;
    let num_manufacturers = manufacturer::Entity::find().count(db).await?;
    let num_visits = record_visit(db, session_id).await?;
    debug!(num_visits, "dashboard_snapshot");
    Ok(DashboardSnapshot { num_drivers, num_cars, num_manufacturers, num_visits })
}

async fn record_visit(db: &DatabaseConnection, session_id: Uuid) -> Result<u64, ServiceError> {
    let txn = db.begin().await?;
    let Some(found) = session::Entity::find_by_id(session_id).lock_exclusive().one(&txn).await? else {
        txn.rollback().await?;
        return Err(ServiceError::Unauthenticated);
    };
    let visits = found.get(VISITS_KEY).and_then(Value::as_u64).unwrap_or(0) + 1;
    session::set_value(&txn, session_id, VISITS_KEY, json!(visits)).await?;
    txn.commit().await?;
    Ok(visits)
}
