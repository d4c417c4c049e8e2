use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::claims::Claims;
use crate::error::AuthError;
use crate::source::TokenSources;
use crate::verifier::TokenVerifier;

/// Verified identity of the caller, resolved through the configured token
/// sources and verifier.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
    pub token: String,
}

impl AuthContext {
    pub fn subject(&self) -> &str {
        &self.claims.subject
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    Arc<TokenVerifier>: FromRef<S>,
    TokenSources: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<TokenVerifier>::from_ref(state);
        let sources = TokenSources::from_ref(state);

        let token = sources.resolve(parts)?;
        let claims = verifier.verify(&token)?;

        Ok(Self { claims, token })
    }
}
