//! Outgoing email.
//!
//! Password-reset notifications go through the configured SMTP relay. When no
//! relay is configured, messages are logged instead of sent.

mod smtp;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;

pub use smtp::SmtpMailer;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Send error: {0}")]
    Send(String),
}

/// A plain-text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Mail transport seam
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;

    /// Whether messages actually leave the process
    fn delivers(&self) -> bool {
        true
    }
}

/// Logs messages instead of sending them (no relay configured).
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        tracing::warn!("SMTP not configured - logging email instead of sending");
        tracing::info!(
            "=== EMAIL (not sent) ===\n\
             To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             ========================",
            email.to,
            email.subject,
            email.body
        );
        Ok(())
    }

    fn delivers(&self) -> bool {
        false
    }
}

/// Pick the transport matching the configuration.
pub fn mailer_from_config(config: &Config) -> Arc<dyn Mailer> {
    match &config.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "Using SMTP relay for email");
            Arc::new(SmtpMailer::new(smtp.clone()))
        }
        None => Arc::new(LogMailer),
    }
}
