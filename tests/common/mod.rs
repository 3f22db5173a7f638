//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use sea_orm::{ConnectOptions, Database as SeaDatabase};

use fielddb::config::Config;
use fielddb::infra::Database;

/// Migrated in-memory SQLite database.
///
/// Every pooled connection to `sqlite::memory:` is its own database, so the
/// pool is pinned to exactly one connection.
pub async fn memory_db() -> Database {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::from_connection(SeaDatabase::connect(options).await.unwrap());
    db.run_migrations().await.unwrap();
    db
}

/// Migrated file-backed SQLite database with `max_connections` pooled
/// connections, for tests that need transactions on separate connections.
pub async fn file_db(url: &str, max_connections: u32) -> Database {
    let mut options = ConnectOptions::new(url.to_string());
    options
        .max_connections(max_connections)
        .sqlx_logging(false);

    let db = Database::from_connection(SeaDatabase::connect(options).await.unwrap());
    db.run_migrations().await.unwrap();
    db
}

/// Temporary directory removed on drop.
pub struct Scratch {
    pub root: PathBuf,
}

impl Scratch {
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("fielddb-{}-{}", name, uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    /// SQLite database file inside this directory, created on first connect.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.root.join("fielddb.sqlite").display())
    }

    /// Config with storage under this directory plus the given overrides.
    pub fn config(&self, pairs: &[(&str, &str)]) -> Config {
        let store = self.root.join("store").display().to_string();
        config_with(&store, pairs)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn config_with(storage_root: &str, pairs: &[(&str, &str)]) -> Config {
    let mut vars: Vec<(String, String)> = vec![
        ("DATABASE_URL".to_string(), "sqlite::memory:".to_string()),
        ("STORAGE_ROOT".to_string(), storage_root.to_string()),
    ];
    for (key, value) in pairs {
        vars.retain(|(k, _)| k != key);
        vars.push((key.to_string(), value.to_string()));
    }

    Config::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .unwrap()
}
