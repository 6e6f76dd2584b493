// This project was developed with assistance from GitHub Copilot
// Error taxonomy for key generation, signing and request handling

use axum::{
    http::{header::ALLOW, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum JwksError {
    /// Fatal at startup; the server must not come up without both keys.
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Failed to build JWKS document: {0}")]
    DocumentBuildFailed(String),

    #[error("Method not allowed (allowed: {allow})")]
    MethodNotAllowed { allow: Method },
}

impl IntoResponse for JwksError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            JwksError::KeyGenerationFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "key generation failed")
            }
            JwksError::SigningFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to sign token")
            }
            JwksError::DocumentBuildFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to build jwks")
            }
            JwksError::MethodNotAllowed { .. } => {
                (StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: message.to_string(),
        });

        let mut response = (status, body).into_response();
        if let JwksError::MethodNotAllowed { allow } = &self {
            if let Ok(value) = HeaderValue::from_str(allow.as_str()) {
                response.headers_mut().insert(ALLOW, value);
            }
        }
        response
    }
}
