use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::{AuthError, AuthResult};

/// Where a raw credential is read from on an inbound request.
///
/// Route-specific behaviour lives entirely in the source; verification never
/// inspects the request.
pub trait TokenSource: Send + Sync {
    /// `Ok(None)` when the source does not apply to this request;
    /// `Err` when it applies but the credential material is unusable.
    fn extract(&self, parts: &Parts) -> AuthResult<Option<String>>;
}

/// Standard `Authorization: Bearer <token>` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerHeader;

impl TokenSource for BearerHeader {
    fn extract(&self, parts: &Parts) -> AuthResult<Option<String>> {
        let Some(header_value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(None);
        };
        parse_bearer(header_value).map(Some)
    }
}

fn parse_bearer(value: &axum::http::HeaderValue) -> AuthResult<String> {
    let raw = value
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorization)?
        .trim();

    let token = raw
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthorization)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidAuthorization);
    }

    Ok(token.to_owned())
}

/// Query-parameter credential, honoured only under a fixed path prefix.
///
/// Covers channels that cannot set request headers, such as the
/// notification hub reading `access_token` under `/notification`.
#[derive(Debug, Clone)]
pub struct PathScopedQueryParam {
    path_prefix: String,
    param: String,
}

impl PathScopedQueryParam {
    pub fn new(path_prefix: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            param: param.into(),
        }
    }

    fn path_matches(&self, path: &str) -> bool {
        // Segment-aligned: "/notification" matches "/notification/stream"
        // but not "/notifications".
        match path.strip_prefix(&self.path_prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl TokenSource for PathScopedQueryParam {
    fn extract(&self, parts: &Parts) -> AuthResult<Option<String>> {
        if !self.path_matches(parts.uri.path()) {
            return Ok(None);
        }

        let Some(query) = parts.uri.query() else {
            return Ok(None);
        };

        let token = query.split('&').find_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            (name == self.param && !value.is_empty()).then(|| value.to_owned())
        });
        Ok(token)
    }
}

/// Ordered chain of token sources; the first hit wins.
#[derive(Clone)]
pub struct TokenSources {
    sources: Vec<Arc<dyn TokenSource>>,
}

impl TokenSources {
    pub fn new(sources: Vec<Arc<dyn TokenSource>>) -> Self {
        Self { sources }
    }

    /// Authorization header only.
    pub fn bearer_only() -> Self {
        Self::new(vec![Arc::new(BearerHeader)])
    }

    pub fn with_source(mut self, source: impl TokenSource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    pub fn resolve(&self, parts: &Parts) -> AuthResult<String> {
        for source in &self.sources {
            if let Some(token) = source.extract(parts)? {
                return Ok(token);
            }
        }
        Err(AuthError::MissingCredential)
    }
}

impl Default for TokenSources {
    fn default() -> Self {
        Self::bearer_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    fn parts(uri: &str, bearer: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(()).expect("request").into_parts().0
    }

    #[test]
    fn parse_bearer_accepts_valid_token() {
        let header = HeaderValue::from_static("Bearer abc.def.ghi");
        let token = parse_bearer(&header).expect("token");
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn parse_bearer_rejects_wrong_scheme() {
        let header = HeaderValue::from_static("Basic credentials");
        let err = parse_bearer(&header).expect_err("should reject");
        assert!(matches!(err, AuthError::InvalidAuthorization));
    }

    #[test]
    fn parse_bearer_rejects_empty_value() {
        let header = HeaderValue::from_static("Bearer    ");
        let err = parse_bearer(&header).expect_err("should reject empty token");
        assert!(matches!(err, AuthError::InvalidAuthorization));
    }

    #[test]
    fn query_param_only_applies_under_prefix() {
        let source = PathScopedQueryParam::new("/notification", "access_token");

        let hit = source
            .extract(&parts("/notification/stream?access_token=tok", None))
            .expect("extract");
        assert_eq!(hit.as_deref(), Some("tok"));

        let exact = source
            .extract(&parts("/notification?access_token=tok", None))
            .expect("extract");
        assert_eq!(exact.as_deref(), Some("tok"));

        for uri in [
            "/notifications?access_token=tok",
            "/api/v1/me?access_token=tok",
            "/notification/stream?other=tok",
            "/notification/stream?access_token=",
            "/notification/stream",
        ] {
            assert!(source.extract(&parts(uri, None)).expect("extract").is_none());
        }
    }

    #[test]
    fn chain_prefers_first_hit_and_reports_missing() {
        let sources = TokenSources::new(vec![
            Arc::new(PathScopedQueryParam::new("/notification", "access_token")),
            Arc::new(BearerHeader),
        ]);

        let token = sources
            .resolve(&parts(
                "/notification/stream?access_token=from-query",
                Some("from-header"),
            ))
            .expect("resolve");
        assert_eq!(token, "from-query");

        let token = sources
            .resolve(&parts("/api/v1/me", Some("from-header")))
            .expect("resolve");
        assert_eq!(token, "from-header");

        let err = sources
            .resolve(&parts("/api/v1/me", None))
            .expect_err("nothing presented");
        assert!(matches!(err, AuthError::MissingCredential));
    }
}
