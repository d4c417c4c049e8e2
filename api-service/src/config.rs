use std::env;
use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use jobag_auth::JwtConfig;
use jobag_email::EmailSettings;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub addr: SocketAddr,
    pub jwt: JwtConfig,
    pub allowed_origins: Vec<String>,
    pub email: Option<EmailSettings>,
}

pub fn load_config() -> Result<ServiceConfig> {
    let issuer = env::var("JWT_ISSUER").context("JWT_ISSUER must be set")?;
    let audience = env::var("JWT_AUDIENCE").context("JWT_AUDIENCE must be set")?;
    let secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

    let lifetime_seconds = env::var("JWT_LIFETIME_SECONDS")
        .ok()
        .map(|value| value.parse::<i64>())
        .transpose()
        .context("Failed to parse JWT_LIFETIME_SECONDS")?
        .unwrap_or(3600);

    // The upstream issuer validates with zero clock skew; keep that default.
    let leeway_seconds = env::var("JWT_LEEWAY_SECONDS")
        .ok()
        .map(|value| value.parse::<u32>())
        .transpose()
        .context("Failed to parse JWT_LEEWAY_SECONDS")?
        .unwrap_or(0);

    let jwt = JwtConfig::new(issuer, audience, secret.into_bytes())
        .with_lifetime(lifetime_seconds)
        .with_leeway(leeway_seconds);

    let allowed_origins = parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default());

    let email = EmailSettings::from_env().context("Failed to load email settings")?;

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);
    let ip: IpAddr = host.parse().context("Failed to parse HOST")?;

    Ok(ServiceConfig {
        addr: SocketAddr::from((ip, port)),
        jwt,
        allowed_origins,
        email,
    })
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter_map(|item| {
            let origin = item.trim().trim_end_matches('/');
            (!origin.is_empty()).then(|| origin.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_trims_trailing_slashes() {
        let origins = parse_origins("https://app.jobag.pe/, http://localhost:3000");
        assert_eq!(
            origins,
            vec![
                "https://app.jobag.pe".to_string(),
                "http://localhost:3000".to_string()
            ]
        );
    }

    #[test]
    fn parse_origins_skips_empty_entries() {
        assert!(parse_origins("").is_empty());
        assert!(parse_origins(" , ,").is_empty());
    }
}
