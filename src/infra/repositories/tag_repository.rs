//! Tag and page template repository.

use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, Set};

use super::entities::{page, tag};
use crate::domain::seed::{DefaultPage, DefaultTag};

/// Reference tags and page templates over any connection or transaction.
pub struct TagRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> TagRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn create_tag(&self, tag: &DefaultTag) -> Result<tag::Model, DbErr> {
        tag::ActiveModel {
            name: Set(tag.name.to_string()),
            description: Set(tag.description.to_string()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    pub async fn create_page(&self, page: &DefaultPage) -> Result<page::Model, DbErr> {
        page::ActiveModel {
            name: Set(page.name.to_string()),
            heading: Set(page.heading.to_string()),
            markup_language: Set(page.markup_language.to_string()),
            content: Set(page.content.to_string()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(self.conn)
        .await
    }

    pub async fn list_tags(&self) -> Result<Vec<tag::Model>, DbErr> {
        tag::Entity::find().all(self.conn).await
    }

    pub async fn count_pages(&self) -> Result<u64, DbErr> {
        page::Entity::find().count(self.conn).await
    }
}
