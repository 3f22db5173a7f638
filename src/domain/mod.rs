//! Domain layer - Core entities and reference data
//!
//! Types here carry no database or transport concerns.

pub mod language;
pub mod password;
pub mod seed;
pub mod user;

pub use language::{parse_iso_639_3, Language, LanguageDataError};
pub use password::Password;
pub use user::{User, UserRole};
