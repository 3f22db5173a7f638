//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod bootstrap_marker;
pub mod language;
pub mod page;
pub mod tag;
pub mod user;
