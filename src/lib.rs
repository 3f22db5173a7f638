//! fielddb - Linguistic field database instance management
//!
//! Prepares a fresh database for a field linguistics project: default
//! accounts, reference tags, page templates and the ISO 639-3 language
//! table are seeded exactly once, guarded by a persistent marker row.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, passwords, languages and the default seed set
//! - **services**: Bootstrap sequence and password reset
//! - **infra**: Database, repositories, Unit of Work, storage tree
//! - **mail**: Outgoing email through an SMTP relay
//! - **media**: Reduced-size copies of uploaded media
//! - **api**: HTTP handlers and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Seed a fresh database (no-op once done)
//! fielddb bootstrap
//!
//! # Bootstrap, then start the server
//! fielddb serve -p 5000
//!
//! # Inspect migrations
//! fielddb migrate status
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod mail;
pub mod media;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult, BootstrapError};
pub use services::{bootstrap, BootstrapOutcome};
