//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module.

pub mod bootstrap;
pub mod mail;
pub mod media;
pub mod migrate;
pub mod serve;
