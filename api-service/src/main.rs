use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use jobag_auth::{TokenIssuer, TokenVerifier};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use api_service::{config, notification_sources, router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = config::load_config()?;
    match &config.email {
        Some(settings) => info!(host = %settings.host, "outbound email configured"),
        None => info!("outbound email not configured"),
    }

    let state = AppState {
        verifier: Arc::new(TokenVerifier::new(config.jwt.clone())),
        sources: notification_sources(),
        issuer: Arc::new(TokenIssuer::new(config.jwt.clone())),
    };

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid origin in ALLOWED_ORIGINS: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true);

    let app = router(state).layer(cors);

    info!(addr = %config.addr, "starting api-service");
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
