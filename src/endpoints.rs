// This project was developed with assistance from GitHub Copilot
// JWKS and auth endpoint implementation

use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, Method},
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::instrument;

use crate::clock::Clock;
use crate::discovery::build_jwks;
use crate::error::JwksError;
use crate::key_management::KeyRegistry;
use crate::token::{self, SigningMode};
use crate::types::AuthResponse;

/// Everything a request handler reads. Nothing in here is mutated after startup.
pub struct ServiceState {
    pub registry: Arc<KeyRegistry>,
    pub clock: Arc<dyn Clock>,
    pub token_subject: String,
}

/// Application state shared by all handlers
pub type AppState = Arc<ServiceState>;

/// JWKS endpoint handler - serves public keys in JWKS format
/// Only returns keys that have not expired
#[instrument(name = "jwks.get", skip_all, fields(keys))]
pub async fn jwks_handler(State(state): State<AppState>) -> Result<impl IntoResponse, JwksError> {
    let now = state.clock.now();
    let jwks = build_jwks(&state.registry, now);
    tracing::Span::current().record("keys", jwks.keys.len());

    // Serialized here rather than through `Json` so a failure is reported
    // as DocumentBuildFailed in the usual error envelope.
    let body = serde_json::to_vec(&jwks)
        .map_err(|e| JwksError::DocumentBuildFailed(e.to_string()))?;

    Ok(([(CONTENT_TYPE, "application/json")], body))
}

/// Auth endpoint handler - issues JWTs for authentication
/// Presence of the `expired` query parameter signs with the expired key,
/// whatever its value and however often it is repeated
#[instrument(name = "auth.post", skip_all, fields(mode, kid))]
pub async fn auth_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<AuthResponse>, JwksError> {
    let now = state.clock.now();
    let expired = params.iter().any(|(name, _)| name == "expired");
    let mode = SigningMode::from_expired_flag(expired);
    let key = mode.key(&state.registry);

    let span = tracing::Span::current();
    span.record("mode", tracing::field::debug(mode));
    span.record("kid", key.kid());

    let issued = token::issue(key, now, mode.policy(), &state.token_subject)?;

    Ok(Json(AuthResponse {
        token: issued.token,
        kid: issued.kid,
    }))
}

pub async fn jwks_method_not_allowed() -> JwksError {
    JwksError::MethodNotAllowed { allow: Method::GET }
}

pub async fn auth_method_not_allowed() -> JwksError {
    JwksError::MethodNotAllowed {
        allow: Method::POST,
    }
}
