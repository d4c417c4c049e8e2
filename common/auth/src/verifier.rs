use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use tracing::debug;

use crate::claims::Claims;
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

/// Stateless HS256 credential verifier.
///
/// `verify` is a pure function of the token, the configured options and the
/// clock; it may be called concurrently from any number of request tasks.
#[derive(Clone)]
pub struct TokenVerifier {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(&config.secret);
        Self {
            config,
            decoding_key,
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Validate a raw credential against the configured options and the
    /// current clock.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// Validate against an explicit clock reading.
    ///
    /// Check order: header shape and algorithm, issuer (on the unverified
    /// payload, so the outcome does not depend on signature validity),
    /// signature, audience, then lifetime. A token is alive while
    /// `now` lies inside `[iat, exp)` stretched by the configured leeway.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let header = decode_header(token)
            .map_err(|err| AuthError::MalformedToken(format!("header: {err}")))?;
        if header.alg != Algorithm::HS256 {
            return Err(AuthError::MalformedToken(format!(
                "unsupported algorithm {:?}",
                header.alg
            )));
        }

        let issuer = unverified_issuer(token)?;
        if issuer != self.config.issuer {
            return Err(AuthError::IssuerMismatch {
                expected: self.config.issuer.clone(),
                found: issuer,
            });
        }

        // Signature only; claim checks are done below so each failure keeps
        // its own rejection kind and the expiry bound stays half-open.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<serde_json::Value>(token, &self.decoding_key, &validation)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken(err.to_string()),
            })?;

        let claims = Claims::try_from(data.claims)?;

        if !claims
            .audience
            .iter()
            .any(|audience| audience == &self.config.audience)
        {
            return Err(AuthError::AudienceMismatch {
                expected: self.config.audience.clone(),
            });
        }

        let leeway = Duration::seconds(i64::from(self.config.leeway_seconds));
        let valid_from = claims
            .not_before
            .map_or(claims.issued_at, |nbf| nbf.max(claims.issued_at));
        if now < valid_from - leeway {
            return Err(AuthError::NotYetValid { valid_from });
        }
        if now >= claims.expires_at + leeway {
            return Err(AuthError::Expired {
                expired_at: claims.expires_at,
            });
        }

        debug!(subject = %claims.subject, "verified token successfully");
        Ok(claims)
    }
}

/// Read `iss` from the payload without verifying the signature.
fn unverified_issuer(token: &str) -> AuthResult<String> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) if segments.next().is_none() => payload,
        _ => {
            return Err(AuthError::MalformedToken(
                "expected three dot-separated segments".into(),
            ))
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|err| AuthError::MalformedToken(format!("payload: {err}")))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|err| AuthError::MalformedToken(format!("payload: {err}")))?;

    value
        .get("iss")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| AuthError::MalformedToken("claim 'iss' missing or not a string".into()))
}
