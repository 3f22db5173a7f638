//! First-run bootstrap sequence.
//!
//! Seeds default accounts, reference tags, page templates and the ISO 639-3
//! language table exactly once per database, then creates the storage tree.
//! The marker row and all seed rows are written in one transaction.

use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use crate::config::{Config, CONTENTION_ATTEMPTS};
use crate::domain::seed::{DEFAULT_PAGES, DEFAULT_TAGS, DEFAULT_USERS};
use crate::domain::{language::BUNDLED_ISO_639_3, parse_iso_639_3, Language, Password};
use crate::errors::BootstrapError;
use crate::infra::db::{contention_backoff, is_lock_contention};
use crate::infra::{
    ensure_storage_tree, CreatedDirs, Database, MarkerClaim, MarkerRepository, NewUser, UnitOfWork,
};

/// What a bootstrap run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// This run seeded the database and set the marker.
    Seeded(SeedSummary),
    /// The marker was already set (or another process set it first); nothing
    /// was written.
    AlreadyBootstrapped,
}

/// Counts of what was seeded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub tags: usize,
    pub pages: usize,
    pub languages: u64,
    pub created_dirs: Vec<PathBuf>,
}

/// Connect, migrate and run the bootstrap sequence.
pub async fn bootstrap(config: &Config) -> Result<BootstrapOutcome, BootstrapError> {
    let db = Database::connect_without_migrations(config)
        .await
        .map_err(BootstrapError::Connection)?;
    db.run_migrations().await?;

    Bootstrapper::new(db.connection(), config).run().await
}

/// Runs the bootstrap sequence against an open, migrated connection.
pub struct Bootstrapper<'a> {
    db: &'a DatabaseConnection,
    config: &'a Config,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(db: &'a DatabaseConnection, config: &'a Config) -> Self {
        Self { db, config }
    }

    /// Run the sequence, retrying while a concurrent bootstrap holds the
    /// database write lock. A retry that finds the marker set is a no-op.
    pub async fn run(&self) -> Result<BootstrapOutcome, BootstrapError> {
        let mut attempt = 1;
        loop {
            match self.run_once().await {
                Err(BootstrapError::Database(e))
                    if attempt < CONTENTION_ATTEMPTS && is_lock_contention(&e) =>
                {
                    tracing::warn!(attempt, error = %e, "Database busy with a concurrent bootstrap, retrying");
                    contention_backoff(attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Bootstrap failed, all seed data rolled back");
                    return Err(e);
                }
                outcome => return outcome,
            }
        }
    }

    async fn run_once(&self) -> Result<BootstrapOutcome, BootstrapError> {
        if MarkerRepository::new(self.db).is_set().await? {
            tracing::info!("Bootstrap marker present, skipping seeding");
            return Ok(BootstrapOutcome::AlreadyBootstrapped);
        }

        // Hashing and parsing happen before the transaction so the write
        // lock is held only for the inserts
        let accounts = if self.config.empty_database {
            tracing::info!("EMPTY_DATABASE set, skipping default accounts and tags");
            None
        } else {
            Some(self.default_accounts()?)
        };
        let languages = if self.config.add_language_data {
            Some(self.load_languages().await?)
        } else {
            None
        };

        let uow = UnitOfWork::begin(self.db).await?;

        match self
            .seed(&uow, accounts.as_deref(), languages.as_deref())
            .await
        {
            Ok(Some((summary, dirs))) => {
                // Dropping `dirs` on a failed commit removes what this run created
                uow.commit().await?;
                dirs.keep();
                tracing::info!(
                    users = summary.users,
                    tags = summary.tags,
                    pages = summary.pages,
                    languages = summary.languages,
                    "Bootstrap completed"
                );
                Ok(BootstrapOutcome::Seeded(summary))
            }
            Ok(None) => {
                uow.rollback().await;
                tracing::info!("Another process completed the bootstrap first");
                Ok(BootstrapOutcome::AlreadyBootstrapped)
            }
            Err(e) => {
                uow.rollback().await;
                Err(e)
            }
        }
    }

    /// Write everything inside the caller's transaction.
    ///
    /// Returns `None` when the marker was claimed by someone else.
    async fn seed(
        &self,
        uow: &UnitOfWork,
        accounts: Option<&[NewUser]>,
        languages: Option<&[Language]>,
    ) -> Result<Option<(SeedSummary, CreatedDirs)>, BootstrapError> {
        if uow.marker().claim().await? == MarkerClaim::AlreadyClaimed {
            return Ok(None);
        }

        let mut summary = SeedSummary::default();

        if let Some(accounts) = accounts {
            self.seed_defaults(uow, accounts, &mut summary).await?;
        }

        if let Some(languages) = languages {
            let existing = uow.languages().count().await?;
            if existing > 0 {
                return Err(BootstrapError::precondition(format!(
                    "languages table must be empty before loading ISO 639-3 data, found {} rows",
                    existing
                )));
            }
            summary.languages = uow.languages().insert_all(languages).await?;
            tracing::debug!(count = summary.languages, "Language table loaded");
        }

        uow.marker()
            .record(accounts.is_some(), summary.languages)
            .await?;

        let dirs = ensure_storage_tree(&self.config.storage_root)
            .map_err(|(path, source)| BootstrapError::Storage { path, source })?;
        summary.created_dirs = dirs.paths().to_vec();

        Ok(Some((summary, dirs)))
    }

    /// Default accounts with their passwords already hashed.
    fn default_accounts(&self) -> Result<Vec<NewUser>, BootstrapError> {
        DEFAULT_USERS
            .iter()
            .map(|user| {
                let password = Password::new(user.password).map_err(|e| {
                    BootstrapError::seed_data(format!("{}: {}", user.username, e))
                })?;

                Ok(NewUser {
                    username: user.username.to_string(),
                    password_hash: password.into_string(),
                    first_name: user.first_name.to_string(),
                    last_name: user.last_name.to_string(),
                    email: Some(self.config.admin_email.clone()),
                    role: user.role,
                })
            })
            .collect()
    }

    async fn seed_defaults(
        &self,
        uow: &UnitOfWork,
        accounts: &[NewUser],
        summary: &mut SeedSummary,
    ) -> Result<(), BootstrapError> {
        for account in accounts {
            uow.users().create(account.clone()).await?;
            summary.users += 1;
            tracing::debug!(username = %account.username, role = %account.role, "Created default user");
        }

        for tag in DEFAULT_TAGS {
            uow.tags().create_tag(tag).await?;
            summary.tags += 1;
        }

        for page in DEFAULT_PAGES {
            uow.tags().create_page(page).await?;
            summary.pages += 1;
        }

        Ok(())
    }

    async fn load_languages(&self) -> Result<Vec<Language>, BootstrapError> {
        let source = match &self.config.language_data_path {
            Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                BootstrapError::seed_data(format!("cannot read {}: {}", path.display(), e))
            })?,
            None => BUNDLED_ISO_639_3.to_string(),
        };

        let languages =
            parse_iso_639_3(&source).map_err(|e| BootstrapError::seed_data(e.to_string()))?;
        if languages.is_empty() {
            return Err(BootstrapError::seed_data("language data file contains no rows"));
        }

        Ok(languages)
    }
}
