//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories and the transactional Unit of Work
//! - Permanent file storage tree

pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    LanguageRepository, MarkerClaim, MarkerRepository, NewUser, TagRepository, UserRepository,
};
pub use storage::{ensure_storage_tree, CreatedDirs};
pub use unit_of_work::UnitOfWork;
