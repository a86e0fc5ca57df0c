//! Create `driver` table.
//!
//! Drivers are the login identities; `license_number` is optional but unique when set.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Driver::Table)
                    .if_not_exists()
                    .col(uuid(Driver::Id).primary_key())
                    .col(string_len(Driver::Username, 150).unique_key().not_null())
                    .col(string_len(Driver::FirstName, 150).not_null())
                    .col(string_len(Driver::LastName, 150).not_null())
                    .col(string_len(Driver::Email, 254).not_null())
                    // Explicitly nullable: drivers created without a license are allowed
                    .col(
                        ColumnDef::new(Driver::LicenseNumber)
                            .string_len(255)
                            .null()
                            .unique_key(),
                    )
                    .col(boolean(Driver::IsStaff).not_null())
                    .col(timestamp_with_time_zone(Driver::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Driver::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Driver::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Driver { Table, Id, Username, FirstName, LastName, Email, LicenseNumber, IsStaff, CreatedAt, UpdatedAt }
