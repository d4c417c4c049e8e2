use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use jobag_auth::{BearerHeader, PathScopedQueryParam, TokenIssuer, TokenSources, TokenVerifier};

pub mod config;
pub mod handlers;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub sources: TokenSources,
    pub issuer: Arc<TokenIssuer>,
}

impl FromRef<AppState> for Arc<TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}

impl FromRef<AppState> for TokenSources {
    fn from_ref(state: &AppState) -> Self {
        state.sources.clone()
    }
}

/// Bearer header everywhere, plus the `access_token` query parameter for the
/// notification channel, which cannot set request headers.
pub fn notification_sources() -> TokenSources {
    TokenSources::new(vec![
        Arc::new(PathScopedQueryParam::new("/notification", "access_token")),
        Arc::new(BearerHeader),
    ])
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/notification/stream", get(handlers::notification_stream))
        .route("/api/v1/me", get(handlers::me))
        .route("/api/v1/token", post(handlers::issue_token))
        .with_state(state)
}
