//! Toggle the requesting driver's membership in a car's driver set.

use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect, TransactionTrait};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::{car, car_driver};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    Assigned,
    Unassigned,
}

/// Flip `(car_id, driver_id)` membership. The car row is locked for the
/// duration so concurrent toggles on one car serialize.
#[instrument(skip(db))]
pub async fn toggle(db: &DatabaseConnection, driver_id: Uuid, car_id: Uuid) -> Result<AssignmentState, ServiceError> {
    let txn = db.begin().await?;
    let locked = car::Entity::find_by_id(car_id).lock_exclusive().one(&txn).await?;
    if locked.is_none() {
        txn.rollback().await?;
        return Err(ServiceError::not_found("car"));
    }

    let state = if car_driver::is_assigned(&txn, car_id, driver_id).await? {
        car_driver::unassign(&txn, car_id, driver_id).await?;
        AssignmentState::Unassigned
    } else {
        car_driver::assign(&txn, car_id, driver_id).await?;
        AssignmentState::Assigned
    };
    txn.commit().await?;

    info!(car_id = %car_id, driver_id = %driver_id, state = ?state, "assignment_toggled");
    Ok(state)
}
