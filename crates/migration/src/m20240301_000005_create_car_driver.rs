//! Create `car_driver` join table for the car <-> driver assignment.
//!
//! The composite primary key keeps membership a set.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CarDriver::Table)
                    .if_not_exists()
                    .col(uuid(CarDriver::CarId))
                    .col(uuid(CarDriver::DriverId))
                    .primary_key(
                        Index::create()
                            .name("pk_car_driver")
                            .col(CarDriver::CarId)
                            .col(CarDriver::DriverId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_driver_car")
                            .from(CarDriver::Table, CarDriver::CarId)
                            .to(Car::Table, Car::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_driver_driver")
                            .from(CarDriver::Table, CarDriver::DriverId)
                            .to(Driver::Table, Driver::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CarDriver::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CarDriver { Table, CarId, DriverId }

#[derive(DeriveIden)]
enum Car { Table, Id }

#[derive(DeriveIden)]
enum Driver { Table, Id }
