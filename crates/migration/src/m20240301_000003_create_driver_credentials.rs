//! Create `driver_credentials` table storing password hashes, one row per driver.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DriverCredentials::Table)
                    .if_not_exists()
                    .col(uuid(DriverCredentials::Id).primary_key())
                    .col(uuid(DriverCredentials::DriverId).unique_key().not_null())
                    .col(string_len(DriverCredentials::PasswordHash, 255).not_null())
                    .col(string_len(DriverCredentials::PasswordAlgorithm, 64).not_null())
                    .col(timestamp_with_time_zone(DriverCredentials::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(DriverCredentials::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_credentials_driver")
                            .from(DriverCredentials::Table, DriverCredentials::DriverId)
                            .to(Driver::Table, Driver::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DriverCredentials::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DriverCredentials {
    Table,
    Id,
    DriverId,
    PasswordHash,
    PasswordAlgorithm,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Driver { Table, Id }
