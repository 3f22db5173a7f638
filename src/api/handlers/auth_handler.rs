//! Account recovery handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// Password reset request
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, max = 255, message = "username is required"))]
    pub username: String,
}

/// Create account recovery routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/reset-password", post(reset_password))
}

/// Generate a new password and email it to the account owner
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.password_reset.reset(payload.username.trim()).await?;

    Ok(Json(MessageResponse::new(
        "A new password has been sent to the email address on file",
    )))
}
