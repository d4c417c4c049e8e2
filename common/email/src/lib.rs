use std::env;
use std::fmt;

use thiserror::Error;

pub type EmailResult<T> = Result<T, EmailConfigError>;

#[derive(Debug, Error)]
pub enum EmailConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration {0}: {1}")]
    Invalid(&'static str, String),
}

/// Outbound SMTP settings, loaded once at startup and immutable thereafter.
#[derive(Clone)]
pub struct EmailSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub enable_ssl: bool,
    pub mail_address: MailAddress,
}

#[derive(Debug, Clone)]
pub struct MailAddress {
    pub address: String,
    pub display_name: Option<String>,
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the password
        f.debug_struct("EmailSettings")
            .field("username", &self.username)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("enable_ssl", &self.enable_ssl)
            .field("mail_address", &self.mail_address)
            .finish_non_exhaustive()
    }
}

impl EmailSettings {
    /// Load settings from `EMAIL_*` environment variables.
    ///
    /// Returns `Ok(None)` when `EMAIL_HOST` is unset, meaning outbound email
    /// is not configured for this deployment.
    pub fn from_env() -> EmailResult<Option<Self>> {
        let Some(host) = optional_var("EMAIL_HOST") else {
            return Ok(None);
        };

        let port = parse_port(&require_var("EMAIL_PORT")?)?;
        let username = require_var("EMAIL_USERNAME")?;
        let password = require_var("EMAIL_PASSWORD")?;
        let enable_ssl = optional_var("EMAIL_ENABLE_SSL")
            .map(|value| parse_bool(&value))
            .unwrap_or(true);

        let mail_address = MailAddress {
            address: require_var("EMAIL_FROM_ADDRESS")?,
            display_name: optional_var("EMAIL_FROM_NAME"),
        };

        Ok(Some(Self {
            username,
            password,
            host,
            port,
            enable_ssl,
            mail_address,
        }))
    }
}

fn require_var(key: &'static str) -> EmailResult<String> {
    optional_var(key).ok_or(EmailConfigError::Missing(key))
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_port(value: &str) -> EmailResult<u16> {
    value
        .parse::<u16>()
        .map_err(|err| EmailConfigError::Invalid("EMAIL_PORT", err.to_string()))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
