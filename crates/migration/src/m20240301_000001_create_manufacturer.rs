//! Create `manufacturer` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Manufacturer::Table)
                    .if_not_exists()
                    .col(uuid(Manufacturer::Id).primary_key())
                    .col(string_len(Manufacturer::Name, 255).not_null())
                    .col(string_len(Manufacturer::Country, 255).not_null())
                    .col(timestamp_with_time_zone(Manufacturer::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Manufacturer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Manufacturer { Table, Id, Name, Country, CreatedAt }
