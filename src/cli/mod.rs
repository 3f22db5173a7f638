//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `bootstrap` - First-run seeding
//! - `migrate` - Database migrations
//! - `serve` - Bootstrap, then start the HTTP server
//! - `media` - Reduced-size media copies
//! - `mail` - Relay checks

pub mod args;

pub use args::{Cli, Commands};
