//! ISO 639-3 language database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Language;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "languages")]
pub struct Model {
    /// Three-letter ISO 639-3 identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub part2b: String,
    pub part2t: String,
    pub part1: String,
    pub scope: String,
    pub language_type: String,
    pub ref_name: String,
    pub comment: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Language {
    fn from(model: Model) -> Self {
        Language {
            id: model.id,
            part2b: model.part2b,
            part2t: model.part2t,
            part1: model.part1,
            scope: model.scope,
            language_type: model.language_type,
            ref_name: model.ref_name,
            comment: model.comment,
        }
    }
}
