use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Registered claim names kept out of the `extra` map.
const REGISTERED: &[&str] = &["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// Application-focused representation of a verified token payload.
///
/// `subject` and `extra` are carried verbatim from the payload; nothing is
/// normalised beyond timestamp decoding.
#[derive(Debug, Clone, Serialize)]
pub struct Claims {
    pub subject: String,
    pub issuer: String,
    pub audience: Vec<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub not_before: Option<DateTime<Utc>>,
    /// Custom (non-registered) claims.
    pub extra: serde_json::Map<String, serde_json::Value>,
    /// Full payload as presented.
    pub raw: serde_json::Value,
}

impl Claims {
    /// Look up a custom claim by name.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.extra.get(name)
    }
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    sub: String,
    iss: String,
    #[serde(default)]
    aud: Option<AudienceRepr>,
    exp: i64,
    iat: i64,
    #[serde(default)]
    nbf: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AudienceRepr {
    Single(String),
    Many(Vec<String>),
}

fn timestamp(name: &'static str, value: i64) -> AuthResult<DateTime<Utc>> {
    Utc.timestamp_opt(value, 0)
        .single()
        .ok_or_else(|| AuthError::MalformedToken(format!("claim '{name}' is out of range")))
}

impl TryFrom<serde_json::Value> for Claims {
    type Error = AuthError;

    fn try_from(value: serde_json::Value) -> AuthResult<Self> {
        let repr: ClaimsRepr = serde_json::from_value(value.clone())
            .map_err(|err| AuthError::MalformedToken(format!("claim payload: {err}")))?;

        let expires_at = timestamp("exp", repr.exp)?;
        let issued_at = timestamp("iat", repr.iat)?;
        let not_before = repr.nbf.map(|nbf| timestamp("nbf", nbf)).transpose()?;

        let audience = match repr.aud {
            Some(AudienceRepr::Single(item)) => vec![item],
            Some(AudienceRepr::Many(items)) => items,
            None => Vec::new(),
        };

        let extra = match &value {
            serde_json::Value::Object(map) => map
                .iter()
                .filter(|(name, _)| !REGISTERED.contains(&name.as_str()))
                .map(|(name, claim)| (name.clone(), claim.clone()))
                .collect(),
            _ => serde_json::Map::new(),
        };

        Ok(Self {
            subject: repr.sub,
            issuer: repr.iss,
            audience,
            issued_at,
            expires_at,
            not_before,
            extra,
            raw: value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn audience_accepts_string_or_array() {
        let single = Claims::try_from(json!({
            "sub": "user-1", "iss": "jobag", "aud": "jobag-clients",
            "exp": 2_000_000_000i64, "iat": 1_000_000_000i64,
        }))
        .expect("single audience");
        assert_eq!(single.audience, vec!["jobag-clients".to_string()]);

        let many = Claims::try_from(json!({
            "sub": "user-1", "iss": "jobag", "aud": ["a", "b"],
            "exp": 2_000_000_000i64, "iat": 1_000_000_000i64,
        }))
        .expect("audience list");
        assert_eq!(many.audience, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn custom_claims_survive_verbatim() {
        let claims = Claims::try_from(json!({
            "sub": "user-42", "iss": "jobag", "aud": "jobag-clients",
            "exp": 2_000_000_000i64, "iat": 1_000_000_000i64,
            "roles": ["employer"], "tenant": "acme",
        }))
        .expect("claims");
        assert_eq!(claims.subject, "user-42");
        assert_eq!(claims.get("roles"), Some(&json!(["employer"])));
        assert_eq!(claims.get("tenant"), Some(&json!("acme")));
        assert!(claims.get("iss").is_none());
    }

    #[test]
    fn missing_subject_is_malformed() {
        let err = Claims::try_from(json!({
            "iss": "jobag", "aud": "jobag-clients",
            "exp": 2_000_000_000i64, "iat": 1_000_000_000i64,
        }))
        .expect_err("should reject");
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }
}
