//! Application state shared by handlers.

use std::sync::Arc;

use crate::infra::Database;
use crate::mail::Mailer;
use crate::services::PasswordResetService;

#[derive(Clone)]
pub struct AppState {
    pub database: Arc<Database>,
    pub password_reset: Arc<PasswordResetService>,
}

impl AppState {
    pub fn new(database: Arc<Database>, mailer: Arc<dyn Mailer>) -> Self {
        let password_reset = Arc::new(PasswordResetService::new(
            database.get_connection(),
            mailer,
        ));

        Self {
            database,
            password_reset,
        }
    }
}
