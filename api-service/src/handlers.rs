use axum::extract::State;
use axum::Json;
use jobag_auth::{AuthContext, AuthError};
use serde::{Deserialize, Serialize};

use crate::AppState;

pub async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: String,
    pub claims: serde_json::Map<String, serde_json::Value>,
}

pub async fn me(auth: AuthContext) -> Json<MeResponse> {
    let claims = auth.into_claims();
    Json(MeResponse {
        subject: claims.subject,
        claims: claims.extra,
    })
}

#[derive(Debug, Serialize)]
pub struct NotificationAck {
    pub channel: &'static str,
    pub subject: String,
}

/// Stand-in for the realtime hub: proves the caller is authenticated on the
/// notification channel, whichever source supplied the token.
pub async fn notification_stream(auth: AuthContext) -> Json<NotificationAck> {
    Json(NotificationAck {
        channel: "notification",
        subject: auth.into_claims().subject,
    })
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub subject: String,
    #[serde(default)]
    pub claims: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

pub async fn issue_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let access_token = state.issuer.issue(&request.subject, request.claims)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.issuer.config().lifetime_seconds,
    }))
}
