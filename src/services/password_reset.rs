//! Password reset by email.
//!
//! A fresh password is generated, stored, and mailed to the account's address.
//! The new hash commits only once the relay accepted the message, so a mail
//! failure leaves the old password working.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::Password;
use crate::errors::{AppError, AppResult};
use crate::infra::{UnitOfWork, UserRepository};
use crate::mail::{Mailer, OutgoingEmail};

pub const PASSWORD_RESET_SUBJECT: &str = "Password reset";

pub struct PasswordResetService {
    db: DatabaseConnection,
    mailer: Arc<dyn Mailer>,
}

impl PasswordResetService {
    pub fn new(db: DatabaseConnection, mailer: Arc<dyn Mailer>) -> Self {
        Self { db, mailer }
    }

    /// Reset `username`'s password and email the new one.
    pub async fn reset(&self, username: &str) -> AppResult<()> {
        let user = UserRepository::new(&self.db)
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::validation("username: not a valid username"))?;

        let email = user
            .email
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AppError::validation("username: the user has no email address"))?;

        let plain = Password::generate_plain();
        let hashed = Password::new(&plain)?;

        let uow = UnitOfWork::begin(&self.db).await?;
        if let Err(e) = uow.users().update_password(user.id, hashed.into_string()).await {
            uow.rollback().await;
            return Err(e.into());
        }

        let message = OutgoingEmail::new(
            email,
            PASSWORD_RESET_SUBJECT,
            format!(
                "Dear {},\n\n\
                 Your password has been reset. Your new password is:\n\n    {}\n\n\
                 Please log in and change it.",
                user.full_name(),
                plain
            ),
        );

        if let Err(e) = self.mailer.send(message).await {
            uow.rollback().await;
            return Err(AppError::EmailUnavailable(e.to_string()));
        }

        uow.commit().await?;
        tracing::info!(username = %user.username, "Password reset and emailed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::{Database, NewUser};
    use crate::mail::{MailError, MockMailer};
    use sea_orm::{ConnectOptions, Database as SeaDatabase};

    async fn memory_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::from_connection(SeaDatabase::connect(options).await.unwrap());
        db.run_migrations().await.unwrap();
        db.get_connection()
    }

    async fn add_user(db: &DatabaseConnection, email: Option<&str>) -> String {
        let hash = Password::new("original1").unwrap().into_string();
        UserRepository::new(db)
            .create(NewUser {
                username: "speaker".to_string(),
                password_hash: hash.clone(),
                first_name: "Ana".to_string(),
                last_name: "Lopez".to_string(),
                email: email.map(str::to_string),
                role: UserRole::Contributor,
            })
            .await
            .unwrap();
        hash
    }

    #[tokio::test]
    async fn test_user_without_email_is_rejected() {
        let db = memory_db().await;
        add_user(&db, None).await;

        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let service = PasswordResetService::new(db, Arc::new(mailer));
        let err = service.reset("speaker").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_message_addressed_to_user() {
        let db = memory_db().await;
        add_user(&db, Some("ana@example.org")).await;

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email| {
                email.to == "ana@example.org"
                    && email.subject == PASSWORD_RESET_SUBJECT
                    && email.body.starts_with("Dear Ana Lopez,")
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = PasswordResetService::new(db.clone(), Arc::new(mailer));
        service.reset("speaker").await.unwrap();

        let user = UserRepository::new(&db)
            .find_by_username("speaker")
            .await
            .unwrap()
            .unwrap();
        assert!(!Password::from_hash(user.password_hash).verify("original1"));
    }

    #[tokio::test]
    async fn test_mail_failure_rolls_back() {
        let db = memory_db().await;
        let original = add_user(&db, Some("ana@example.org")).await;

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(MailError::Send("timeout".to_string())));

        let service = PasswordResetService::new(db.clone(), Arc::new(mailer));
        let err = service.reset("speaker").await.unwrap_err();
        assert!(matches!(err, AppError::EmailUnavailable(_)));

        let user = UserRepository::new(&db)
            .find_by_username("speaker")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.password_hash, original);
    }
}
