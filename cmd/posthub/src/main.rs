//! # PostHub Binary
//!
//! Loads settings, installs logging, wires the adapters into the services and
//! serves the API until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::web::{create_router, AppState};
use api_adapters::ErrorResponder;
use auth_adapters::{Argon2PasswordHasher, JwtTokenService};
use configs::{LoggingSettings, Settings};
use storage_adapters::MemoryDataContext;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(not(feature = "web-axum"))]
compile_error!("posthub needs an HTTP adapter; enable the `web-axum` feature");

#[cfg(not(feature = "auth-jwt"))]
compile_error!("posthub needs a token adapter; enable the `auth-jwt` feature");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    init_tracing(&settings.logging);

    info!(
        environment = ?settings.environment,
        jwt_secret_len = settings.auth.secret_len(),
        "configuration loaded"
    );

    // 1. Storage
    let data = MemoryDataContext::new();

    // 2. Auth
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let tokens = Arc::new(JwtTokenService::new(
        &settings.auth.jwt_secret,
        settings.auth.issuer.clone(),
        settings.auth.audience.clone(),
        chrono::Duration::minutes(settings.auth.token_ttl_minutes),
    ));

    // 3. Services and HTTP
    let state = AppState::new(
        data.users.clone(),
        data.posts.clone(),
        data.comments.clone(),
        hasher,
        tokens,
        ErrorResponder::new(settings.is_development()),
    );
    let app = create_router(state);

    let addr = settings.server.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "PostHub listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("PostHub stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
