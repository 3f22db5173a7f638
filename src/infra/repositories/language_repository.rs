//! ISO 639-3 language repository.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, Set};

use super::entities::language::{ActiveModel, Entity as LanguageEntity};
use crate::config::LANGUAGE_INSERT_CHUNK_SIZE;
use crate::domain::Language;

pub struct LanguageRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> LanguageRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        LanguageEntity::find().count(self.conn).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Language>, DbErr> {
        let result = LanguageEntity::find_by_id(id.to_string())
            .one(self.conn)
            .await?;
        Ok(result.map(Language::from))
    }

    /// Bulk insert in fixed-size multi-row statements.
    /// Returns the number of rows written.
    pub async fn insert_all(&self, languages: &[Language]) -> Result<u64, DbErr> {
        let mut written = 0u64;

        for chunk in languages.chunks(LANGUAGE_INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|language| ActiveModel {
                id: Set(language.id.clone()),
                part2b: Set(language.part2b.clone()),
                part2t: Set(language.part2t.clone()),
                part1: Set(language.part1.clone()),
                scope: Set(language.scope.clone()),
                language_type: Set(language.language_type.clone()),
                ref_name: Set(language.ref_name.clone()),
                comment: Set(language.comment.clone()),
            });

            LanguageEntity::insert_many(models)
                .exec_without_returning(self.conn)
                .await?;
            written += chunk.len() as u64;
            tracing::trace!(written, "Inserted language chunk");
        }

        Ok(written)
    }
}
