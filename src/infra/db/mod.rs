//! Database connection and initialization.

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, SqlErr,
    Statement,
};
use sea_orm_migration::MigratorTrait;

use crate::config::{Config, CONTENTION_ATTEMPTS, CONTENTION_RETRY_DELAY_MS};

pub mod migrations;

pub use migrations::Migrator;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect and apply pending migrations.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let db = Self::connect_without_migrations(config).await?;
        db.run_migrations().await?;

        tracing::info!("Database connected and migrations applied");
        Ok(db)
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options.sqlx_logging(false);

        let connection = SeaDatabase::connect(options).await?;
        tracing::debug!(backend = ?connection.get_database_backend(), "Database connection opened");

        Ok(Self { connection })
    }

    /// Wrap an already-open connection.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Run pending migrations.
    ///
    /// Processes starting together against a fresh database race on the same
    /// migrations. The loser sees a unique violation on `seaql_migrations` (or
    /// an object that already exists) and retries; by then the pending list
    /// has shrunk, and every DDL statement is `IF NOT EXISTS`.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        let mut attempt = 1;
        loop {
            match Migrator::up(&self.connection, None).await {
                Ok(()) => return Ok(()),
                Err(e)
                    if attempt < CONTENTION_ATTEMPTS
                        && (is_migration_race(&e) || is_lock_contention(&e)) =>
                {
                    tracing::warn!(attempt, error = %e, "Migrations raced another process, retrying");
                    contention_backoff(attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        let migrations: Vec<(String, bool)> = Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect();

        Ok(migrations)
    }

    /// Drop everything and run all migrations fresh.
    ///
    /// This also drops the bootstrap marker, so the next start seeds again.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

/// Whether a migration failure means another process applied the same step.
fn is_migration_race(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err.to_string().contains("already exists")
}

/// Whether the statement lost a lock to a concurrent writer and can be
/// retried as a whole (SQLite `SQLITE_BUSY`/`SQLITE_LOCKED`, Postgres
/// deadlock victim).
pub fn is_lock_contention(err: &DbErr) -> bool {
    let message = err.to_string();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("deadlock detected")
}

/// Sleep before retry number `attempt`.
pub async fn contention_backoff(attempt: u32) {
    tokio::time::sleep(Duration::from_millis(
        CONTENTION_RETRY_DELAY_MS * u64::from(attempt),
    ))
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_race_detection() {
        let duplicate_table = DbErr::Migration("table \"users\" already exists".to_string());
        assert!(is_migration_race(&duplicate_table));

        let unrelated = DbErr::Custom("permission denied for schema public".to_string());
        assert!(!is_migration_race(&unrelated));
        assert!(!is_lock_contention(&unrelated));
    }

    #[test]
    fn test_lock_contention_detection() {
        let busy = DbErr::Custom(
            "error returned from database: (code: 5) database is locked".to_string(),
        );
        assert!(is_lock_contention(&busy));
        assert!(!is_migration_race(&busy));
    }
}
