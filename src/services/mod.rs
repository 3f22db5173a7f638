//! Application services layer - Use cases.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases.

pub mod bootstrap;
mod password_reset;

pub use bootstrap::{bootstrap, BootstrapOutcome, Bootstrapper, SeedSummary};
pub use password_reset::{PasswordResetService, PASSWORD_RESET_SUBJECT};
