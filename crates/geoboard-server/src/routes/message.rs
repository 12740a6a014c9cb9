//! Message Routes - Post and query location-tagged messages
//!
//! HTTP handlers that delegate to MessageService.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use geoboard::{RepositoryError, Sender};

use crate::models::{AddMessageRequest, MessageResponse, MessagesQuery};
use crate::AppState;

fn repository_error(e: RepositoryError) -> (StatusCode, String) {
    match e {
        RepositoryError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            "no message found with that id".to_string(),
        ),
        RepositoryError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, e.to_string()),
        _ => {
            tracing::error!(error = %e, "Repository failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "repo error".to_string())
        }
    }
}

/// Post a message at a location
#[utoipa::path(
    put,
    path = "/messages",
    request_body = AddMessageRequest,
    responses(
        (status = 200, description = "Message stored", body = MessageResponse),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer" = [])),
    tag = "Message"
)]
pub async fn add_message(
    State(state): State<AppState>,
    Extension(sender): Extension<Sender>,
    Json(payload): Json<AddMessageRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let message = payload
        .into_message(sender)
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let stored = state
        .message_service
        .post(message)
        .await
        .map_err(repository_error)?;

    Ok(Json(stored.into()))
}

/// Messages near a point
///
/// GET /messages?lat=40.0&long=-73.0&radius=200&limit=10&after=0
#[utoipa::path(
    get,
    path = "/messages",
    params(MessagesQuery),
    responses(
        (status = 200, description = "Messages ascending by creation time", body = Vec<MessageResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer" = [])),
    tag = "Message"
)]
pub async fn get_messages(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<MessageResponse>>, (StatusCode, String)> {
    let query = query
        .into_location_query()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let messages = state
        .message_service
        .near(query)
        .await
        .map_err(repository_error)?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// Get message by ID
#[utoipa::path(
    get,
    path = "/messages/{id}",
    params(
        ("id" = String, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Message found", body = MessageResponse),
        (status = 404, description = "Message not found"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer" = [])),
    tag = "Message"
)]
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let stored = state
        .message_service
        .get(&id)
        .await
        .map_err(repository_error)?;

    Ok(Json(stored.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", get(get_messages).put(add_message))
        .route("/messages/:id", get(get_message))
}
