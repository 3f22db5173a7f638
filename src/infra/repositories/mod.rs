//! Repository layer - Data access abstraction
//!
//! Repositories borrow any `ConnectionTrait` implementor, so the same queries
//! run on the pooled connection or inside a transaction.

pub(crate) mod entities;
mod language_repository;
mod marker_repository;
mod tag_repository;
mod user_repository;

pub use language_repository::LanguageRepository;
pub use marker_repository::{MarkerClaim, MarkerRepository};
pub use tag_repository::TagRepository;
pub use user_repository::{NewUser, UserRepository};
