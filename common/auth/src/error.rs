use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Why a presented credential was rejected.
///
/// Every variant is terminal for the request; a rejected credential cannot
/// self-heal, so the caller must reacquire one out of band.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("token signature does not match the configured secret")]
    InvalidSignature,
    #[error("token issuer '{found}' does not match expected issuer '{expected}'")]
    IssuerMismatch { expected: String, found: String },
    #[error("token audience does not include '{expected}'")]
    AudienceMismatch { expected: String },
    #[error("token expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },
    #[error("token not valid before {valid_from}")]
    NotYetValid { valid_from: DateTime<Utc> },
    #[error("no credential presented")]
    MissingCredential,
    #[error("authorization header malformed")]
    InvalidAuthorization,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl AuthError {
    /// Stable machine-readable code surfaced in error responses.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MalformedToken(_) => "AUTH_MALFORMED",
            AuthError::InvalidSignature => "AUTH_SIGNATURE",
            AuthError::IssuerMismatch { .. } => "AUTH_ISSUER",
            AuthError::AudienceMismatch { .. } => "AUTH_AUDIENCE",
            AuthError::Expired { .. } => "AUTH_EXPIRED",
            AuthError::NotYetValid { .. } => "AUTH_NOT_YET_VALID",
            AuthError::MissingCredential => "AUTH_MISSING",
            AuthError::InvalidAuthorization => "AUTH_HEADER",
            AuthError::Signing(_) => "AUTH_SIGNING",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };

        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
