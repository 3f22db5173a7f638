//! Mail command - Relay checks.

use crate::cli::args::{MailAction, MailArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::mail::{mailer_from_config, OutgoingEmail};

/// Execute the mail command
pub async fn execute(args: MailArgs, config: &Config) -> AppResult<()> {
    match args.action {
        MailAction::Test { to } => {
            let mailer = mailer_from_config(config);
            if !mailer.delivers() {
                tracing::warn!("SMTP_HOST is not set; the message will only be logged");
            }

            mailer
                .send(OutgoingEmail::new(
                    to.clone(),
                    "Test message",
                    "This is a test message from your field database instance.",
                ))
                .await
                .map_err(|e| AppError::EmailUnavailable(e.to_string()))?;

            println!("Test message handed to the mailer for {}", to);
        }
    }

    Ok(())
}
