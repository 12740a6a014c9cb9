//! Geoboard API Routes
//!
//! - /health - Liveness (public)
//! - /api-docs/openapi.json - OpenAPI document (public)
//! - /messages - Post and query messages (bearer token)
//! - /messages/:id - Single message (bearer token)

pub mod message;
pub mod swagger;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::auth;
use crate::AppState;

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(swagger::ApiDoc::openapi())
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    // Protected routes (require a bearer token)
    let protected_routes = message::router().layer(middleware::from_fn_with_state(
        state.clone(),
        auth::auth_middleware,
    ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
