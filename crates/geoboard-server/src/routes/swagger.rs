//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{AddMessageRequest, LocationBody, MessageResponse, SenderResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::message::add_message,
        super::message::get_messages,
        super::message::get_message,
    ),
    info(
        title = "Geoboard API",
        version = "0.1.0",
        description = "Location-tagged message board.\n\nPost short messages at a coordinate and read the ones posted nearby.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Message", description = "Message - Post and query by location"),
    ),
    components(
        schemas(
            AddMessageRequest,
            LocationBody,
            MessageResponse,
            SenderResponse,
        )
    ),
    modifiers(&BearerAuth),
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
