//! Bootstrap marker repository.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set, SqlErr};

use super::entities::bootstrap_marker::{ActiveModel, Entity as MarkerEntity, Model};
use crate::config::BOOTSTRAP_MARKER_ID;

/// Result of trying to claim the marker row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerClaim {
    /// This transaction owns the marker; it becomes visible on commit.
    Claimed,
    /// Another transaction already holds or committed the marker.
    AlreadyClaimed,
}

pub struct MarkerRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> MarkerRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Read the marker row, if any.
    pub async fn get(&self) -> Result<Option<Model>, DbErr> {
        MarkerEntity::find_by_id(BOOTSTRAP_MARKER_ID)
            .one(self.conn)
            .await
    }

    pub async fn is_set(&self) -> Result<bool, DbErr> {
        Ok(self.get().await?.is_some())
    }

    /// Insert the single marker row.
    ///
    /// A primary-key conflict is reported as `AlreadyClaimed` rather than an
    /// error: exactly one racing transaction can win the insert.
    pub async fn claim(&self) -> Result<MarkerClaim, DbErr> {
        let model = ActiveModel {
            id: Set(BOOTSTRAP_MARKER_ID),
            completed_at: Set(chrono::Utc::now()),
            seeded_defaults: Set(false),
            languages_seeded: Set(0),
        };

        match MarkerEntity::insert(model).exec_without_returning(self.conn).await {
            Ok(_) => Ok(MarkerClaim::Claimed),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(MarkerClaim::AlreadyClaimed)
            }
            Err(e) => Err(e),
        }
    }

    /// Record what the claiming transaction seeded.
    pub async fn record(&self, seeded_defaults: bool, languages_seeded: u64) -> Result<(), DbErr> {
        let languages_seeded = i32::try_from(languages_seeded).map_err(|_| {
            DbErr::Custom(format!(
                "languages_seeded {} does not fit the marker column",
                languages_seeded
            ))
        })?;
        let model = ActiveModel {
            id: Set(BOOTSTRAP_MARKER_ID),
            completed_at: Set(chrono::Utc::now()),
            seeded_defaults: Set(seeded_defaults),
            languages_seeded: Set(languages_seeded),
        };
        MarkerEntity::update(model).exec(self.conn).await?;
        Ok(())
    }
}
