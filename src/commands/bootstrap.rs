//! Bootstrap command - First-run seeding.

use crate::config::Config;
use crate::errors::BootstrapError;
use crate::services::{bootstrap, BootstrapOutcome};

/// Execute the bootstrap command
pub async fn execute(config: &Config) -> Result<(), BootstrapError> {
    tracing::info!("Running bootstrap...");

    match bootstrap(config).await? {
        BootstrapOutcome::Seeded(summary) => {
            println!(
                "Bootstrap complete: {} users, {} tags, {} pages, {} languages",
                summary.users, summary.tags, summary.pages, summary.languages
            );
            for dir in &summary.created_dirs {
                println!("Created: {}", dir.display());
            }
        }
        BootstrapOutcome::AlreadyBootstrapped => {
            println!("Already bootstrapped, nothing to do");
        }
    }

    Ok(())
}
