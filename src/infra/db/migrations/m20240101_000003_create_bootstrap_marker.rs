//! Migration: Create the bootstrap marker table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No auto-increment: the fixed key is what makes concurrent claims collide
        manager
            .create_table(
                Table::create()
                    .table(BootstrapMarker::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BootstrapMarker::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BootstrapMarker::CompletedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BootstrapMarker::SeededDefaults)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BootstrapMarker::LanguagesSeeded)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BootstrapMarker::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BootstrapMarker {
    Table,
    Id,
    CompletedAt,
    SeededDefaults,
    LanguagesSeeded,
}
