// Router assembly shared by the server binary and integration tests
// Decision: /health and the Swagger UI stay outside the API prefix

use crate::api;
use crate::config::ServerConfig;
use crate::openapi::ApiDoc;
use crate::services::AgeService;
use crate::storage::StorageBackend;
use axum::http::{header, Method};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared handles the routes are built from
#[derive(Clone)]
pub struct Services {
    pub storage: Arc<StorageBackend>,
    pub age: AgeService,
}

impl Services {
    pub fn new(storage: StorageBackend) -> Self {
        Self {
            storage: Arc::new(storage),
            age: AgeService::new(),
        }
    }

    /// Replace the age service, e.g. with one that has a fixed clock
    pub fn with_age_service(mut self, age: AgeService) -> Self {
        self.age = age;
        self
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
}

/// Reports "degraded" when the store does not answer a ping.
async fn health(State(storage): State<Arc<StorageBackend>>) -> Json<HealthResponse> {
    let status = match storage.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(storage = storage.kind(), "Storage ping failed: {:#}", e);
            "degraded"
        }
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        storage: storage.kind(),
    })
}

/// Build the complete application router
pub fn build_router(services: Services, config: &ServerConfig) -> Router {
    let participants_state =
        api::participants::AppState::new(services.storage.clone(), config.max_upload_bytes);
    let webhook_state = api::webhook::AppState::new(services.age);

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }

    let api_routes = Router::new()
        .merge(api::participants::routes(participants_state))
        .merge(api::webhook::routes(webhook_state));

    // Build main router with health (not prefixed) and prefixed API routes
    let app = Router::new()
        .route("/health", get(health).with_state(services.storage))
        .merge(build_router_with_prefix(api_routes, &config.api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]),
        )
    };

    app.layer(TraceLayer::new_for_http())
}

/// Build router with optional API prefix (extracted for testing)
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
