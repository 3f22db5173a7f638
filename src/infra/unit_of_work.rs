//! Unit of Work over a single database transaction.
//!
//! All repositories handed out by a `UnitOfWork` share its transaction, so
//! everything written through them commits or rolls back together.

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use super::repositories::{LanguageRepository, MarkerRepository, TagRepository, UserRepository};

/// An open transaction plus repository access.
///
/// Dropping it without calling `commit` rolls the transaction back.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    /// Begin a new transaction
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        Ok(Self { txn })
    }

    pub fn users(&self) -> UserRepository<'_, DatabaseTransaction> {
        UserRepository::new(&self.txn)
    }

    pub fn tags(&self) -> TagRepository<'_, DatabaseTransaction> {
        TagRepository::new(&self.txn)
    }

    pub fn languages(&self) -> LanguageRepository<'_, DatabaseTransaction> {
        LanguageRepository::new(&self.txn)
    }

    pub fn marker(&self) -> MarkerRepository<'_, DatabaseTransaction> {
        MarkerRepository::new(&self.txn)
    }

    /// Commit all work done through this unit.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Roll back, logging (not returning) a failed rollback.
    pub async fn rollback(self) {
        if let Err(rollback_err) = self.txn.rollback().await {
            tracing::error!("Transaction rollback failed: {}", rollback_err);
        }
    }
}
