//! Migration: Create the ISO 639-3 languages table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Languages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Languages::Id)
                            .string_len(3)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Languages::Part2b).string_len(3).not_null())
                    .col(ColumnDef::new(Languages::Part2t).string_len(3).not_null())
                    .col(ColumnDef::new(Languages::Part1).string_len(2).not_null())
                    .col(ColumnDef::new(Languages::Scope).string_len(1).not_null())
                    .col(ColumnDef::new(Languages::LanguageType).string_len(1).not_null())
                    .col(ColumnDef::new(Languages::RefName).string_len(150).not_null())
                    .col(ColumnDef::new(Languages::Comment).string_len(150).not_null())
                    .to_owned(),
            )
            .await?;

        // Lookups by display name from the language picker
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_languages_ref_name")
                    .table(Languages::Table)
                    .col(Languages::RefName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_languages_ref_name")
                    .table(Languages::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Languages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Languages {
    Table,
    Id,
    #[iden = "part2b"]
    Part2b,
    #[iden = "part2t"]
    Part2t,
    #[iden = "part1"]
    Part1,
    Scope,
    LanguageType,
    RefName,
    Comment,
}
