//! Bootstrap marker entity for SeaORM.
//!
//! Holds at most one row; its presence means first-run seeding committed.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bootstrap_marker")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub completed_at: DateTimeUtc,
    pub seeded_defaults: bool,
    pub languages_seeded: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
