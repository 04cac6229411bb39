//! Application route configuration.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::register_routes;
use super::openapi::ApiDoc;
use super::state::Storage;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(register_routes())
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Account registrar"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    storage: StorageStatus,
}

/// Storage status
#[derive(Serialize)]
struct StorageStatus {
    kind: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with storage connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = match &state.storage {
        Storage::Memory => StorageStatus {
            kind: "memory",
            status: "healthy",
            error: None,
        },
        Storage::Database(database) => match database.ping().await {
            Ok(_) => StorageStatus {
                kind: "database",
                status: "healthy",
                error: None,
            },
            Err(e) => StorageStatus {
                kind: "database",
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        },
    };

    let healthy = storage.status == "healthy";
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        storage,
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
