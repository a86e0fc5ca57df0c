use super::fixtures;
use crate::db::connect_ephemeral;
use crate::{car, car_driver, driver, driver_credentials, manufacturer, session};
use anyhow::Result;
use sea_orm::{EntityTrait, PaginatorTrait, TransactionTrait};

/// Test basic transaction commit
#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    let db = connect_ephemeral().await?;

    let txn = db.begin().await?;
    let created = manufacturer::create(&txn, "Honda", "Japan").await?;
    txn.commit().await?;

    assert!(manufacturer::Entity::find_by_id(created.id).one(&db).await?.is_some());
    Ok(())
}

/// Test transaction rollback
#[tokio::test]
async fn test_transaction_rollback() -> Result<()> {
    let db = connect_ephemeral().await?;

    let txn = db.begin().await?;
    let m = manufacturer::create(&txn, "Honda", "Japan").await?;
    car::create(&txn, "Civic", m.id, &[]).await?;
    txn.rollback().await?;

    assert_eq!(manufacturer::Entity::find().count(&db).await?, 0);
    assert_eq!(car::Entity::find().count(&db).await?, 0);
    Ok(())
}

/// Test deleting a manufacturer removes its cars and their assignments
#[tokio::test]
async fn test_manufacturer_delete_cascades() -> Result<()> {
    let db = connect_ephemeral().await?;
    let m = fixtures::manufacturer(&db, "Toyota").await?;
    let keep = fixtures::manufacturer(&db, "BMW").await?;
    let d = fixtures::driver(&db, "a", None).await?;
    let c = car::create(&db, "Camry", m.id, &[d.id]).await?;
    car::create(&db, "X5", keep.id, &[d.id]).await?;

    manufacturer::delete(&db, m.id).await?;

    assert!(car::Entity::find_by_id(c.id).one(&db).await?.is_none());
    assert!(!car_driver::is_assigned(&db, c.id, d.id).await?);
    assert_eq!(car::Entity::find().count(&db).await?, 1);
    assert!(driver::Entity::find_by_id(d.id).one(&db).await?.is_some());
    Ok(())
}

/// Test deleting a driver removes credentials, sessions and assignments but not cars
#[tokio::test]
async fn test_driver_delete_cascades() -> Result<()> {
    let db = connect_ephemeral().await?;
    let m = fixtures::manufacturer(&db, "Toyota").await?;
    let d = fixtures::driver(&db, "a", None).await?;
    let c = car::create(&db, "Camry", m.id, &[d.id]).await?;
    driver_credentials::upsert_password(&db, d.id, "hash".into(), "argon2").await?;
    let s = session::create(&db, d.id, chrono::Duration::hours(1)).await?;

    driver::delete(&db, d.id).await?;

    assert!(car::Entity::find_by_id(c.id).one(&db).await?.is_some());
    assert!(car_driver::driver_ids_of_car(&db, c.id).await?.is_empty());
    assert!(driver_credentials::find_by_driver(&db, d.id).await?.is_none());
    assert!(session::find_active(&db, s.id).await?.is_none());
    Ok(())
}
