//! JWT Authentication (Bearer Token)
//!
//! Verifies the bearer token and attaches the token's subject to the request
//! as a `Sender` extension.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use geoboard::Sender;

use crate::config::TokenKey;
use crate::AppState;

/// Claims a token must carry; `exp` is checked only when present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
}

/// Decoding key and validation rules for incoming tokens
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(token_key: &TokenKey) -> anyhow::Result<Self> {
        let (key, algorithm) = match token_key {
            TokenKey::Secret(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
            TokenKey::RsaPublicPem(pem) => (DecodingKey::from_rsa_pem(pem)?, Algorithm::RS256),
        };

        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["sub"]);

        Ok(Self { key, validation })
    }

    /// Validate `token` and return the sender it identifies
    pub fn verify(&self, token: &str) -> Result<Sender, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(Sender::new(data.claims.sub, data.claims.username))
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        tracing::warn!("Missing or malformed Authorization header");
        return Err(StatusCode::UNAUTHORIZED);
    };

    match state.verifier.verify(token) {
        Ok(sender) => {
            request.extensions_mut().insert(sender);
            Ok(next.run(request).await)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected bearer token");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
