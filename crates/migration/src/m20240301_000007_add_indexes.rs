use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Car: lookups by manufacturer
        manager
            .create_index(
                Index::create()
                    .name("idx_car_manufacturer")
                    .table(Car::Table)
                    .col(Car::ManufacturerId)
                    .to_owned(),
            )
            .await?;

        // CarDriver: the PK covers car_id first, so driver-side lookups need their own index
        manager
            .create_index(
                Index::create()
                    .name("idx_car_driver_driver")
                    .table(CarDriver::Table)
                    .col(CarDriver::DriverId)
                    .to_owned(),
            )
            .await?;

        // Session: per-driver cleanup and expiry sweeps
        manager
            .create_index(
                Index::create()
                    .name("idx_session_driver")
                    .table(Session::Table)
                    .col(Session::DriverId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_session_expires_at")
                    .table(Session::Table)
                    .col(Session::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_car_manufacturer").table(Car::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_car_driver_driver").table(CarDriver::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_session_driver").table(Session::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_session_expires_at").table(Session::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Car { Table, ManufacturerId }

#[derive(DeriveIden)]
enum CarDriver { Table, DriverId }

#[derive(DeriveIden)]
enum Session { Table, DriverId, ExpiresAt }
