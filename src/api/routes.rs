//! Application route configuration.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::handlers::auth_routes;
use super::AppState;
use crate::infra::MarkerRepository;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    bootstrap: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn healthy() -> Self {
        Self {
            status: "healthy",
            error: None,
        }
    }

    fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: "unhealthy",
            error: Some(error.into()),
        }
    }
}

/// Database connectivity plus whether first-run seeding has completed
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = match state.database.ping().await {
        Ok(_) => ServiceStatus::healthy(),
        Err(e) => ServiceStatus::unhealthy(e.to_string()),
    };

    let bootstrap_status = match MarkerRepository::new(state.database.connection())
        .is_set()
        .await
    {
        Ok(true) => ServiceStatus::healthy(),
        Ok(false) => ServiceStatus::unhealthy("bootstrap marker not set"),
        Err(e) => ServiceStatus::unhealthy(e.to_string()),
    };

    let all_healthy = db_status.status == "healthy" && bootstrap_status.status == "healthy";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth {
            database: db_status,
            bootstrap: bootstrap_status,
        },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
