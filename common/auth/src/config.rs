use std::fmt;

/// Runtime configuration for token issuing and verification.
///
/// Loaded once at startup and shared read-only (wrap in `Arc`); there is no
/// write path after construction.
#[derive(Clone)]
pub struct JwtConfig {
    /// Expected issuer claim (iss).
    pub issuer: String,
    /// Expected audience claim (aud).
    pub audience: String,
    /// Symmetric HS256 signing secret.
    pub secret: Vec<u8>,
    /// Lifetime of newly issued tokens, in seconds.
    pub lifetime_seconds: i64,
    /// Allowable clock skew in seconds when validating iat/nbf/exp.
    pub leeway_seconds: u32,
}

impl JwtConfig {
    /// Construct config with a 1 hour lifetime and zero leeway.
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        secret: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            secret: secret.into(),
            lifetime_seconds: 3600,
            leeway_seconds: 0,
        }
    }

    /// Adjust the lifetime of issued tokens.
    pub fn with_lifetime(mut self, seconds: i64) -> Self {
        self.lifetime_seconds = seconds;
        self
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime_seconds", &self.lifetime_seconds)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict() {
        let config = JwtConfig::new("jobag", "jobag-clients", b"secret".to_vec());
        assert_eq!(config.lifetime_seconds, 3600);
        assert_eq!(config.leeway_seconds, 0);
    }

    #[test]
    fn debug_hides_secret() {
        let config = JwtConfig::new("jobag", "jobag-clients", b"hunter2".to_vec());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
