use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

/// Mints HS256 credentials for the configured issuer/audience pair.
///
/// Registered claims always win over entries in `extra` with the same name.
#[derive(Clone)]
pub struct TokenIssuer {
    config: JwtConfig,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenIssuer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(&config.secret);
        Self {
            config,
            encoding_key,
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Issue a token for `subject`, valid from now for the configured
    /// lifetime.
    pub fn issue(
        &self,
        subject: &str,
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> AuthResult<String> {
        self.issue_at(subject, extra, Utc::now())
    }

    /// Issue a token with an explicit issue time. Used by tests to fabricate
    /// tokens at chosen points in their lifetime.
    pub fn issue_at(
        &self,
        subject: &str,
        extra: serde_json::Map<String, serde_json::Value>,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<String> {
        let expires_at = issued_at + Duration::seconds(self.config.lifetime_seconds);

        let mut payload = extra;
        payload.insert("sub".into(), json!(subject));
        payload.insert("iss".into(), json!(self.config.issuer));
        payload.insert("aud".into(), json!(self.config.audience));
        payload.insert("iat".into(), json!(issued_at.timestamp()));
        payload.insert("exp".into(), json!(expires_at.timestamp()));

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn registered_claims_override_extra() {
        let issuer = TokenIssuer::new(JwtConfig::new("jobag", "jobag-clients", b"S".to_vec()));
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        let mut extra = serde_json::Map::new();
        extra.insert("iss".into(), json!("spoofed"));
        extra.insert("dept".into(), json!("hiring"));
        let token = issuer.issue_at("user-42", extra, at).expect("issue");

        let verifier = crate::TokenVerifier::new(JwtConfig::new(
            "jobag",
            "jobag-clients",
            b"S".to_vec(),
        ));
        let claims = verifier
            .verify_at(&token, at + Duration::seconds(1))
            .expect("verify");
        assert_eq!(claims.issuer, "jobag");
        assert_eq!(claims.get("dept"), Some(&json!("hiring")));
    }

    #[test]
    fn lifetime_controls_expiry() {
        let config = JwtConfig::new("jobag", "jobag-clients", b"S".to_vec()).with_lifetime(60);
        let issuer = TokenIssuer::new(config.clone());
        let verifier = crate::TokenVerifier::new(config);
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        let token = issuer
            .issue_at("user-42", Default::default(), at)
            .expect("issue");
        let claims = verifier
            .verify_at(&token, at + Duration::seconds(59))
            .expect("verify");
        assert_eq!(claims.expires_at, at + Duration::seconds(60));
        assert!(verifier
            .verify_at(&token, at + Duration::seconds(60))
            .is_err());
    }
}
