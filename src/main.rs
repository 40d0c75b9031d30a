// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process;

use casting_rust_server::{
    api::router,
    auth::TokenVerifier,
    config::{LogFormat, ServerConfig, DEFAULT_LOG_FILTER},
    state::AppState,
    store::CatalogStore,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            process::exit(1);
        }
    };
    init_tracing(config.log_format);

    let refresh_interval = config.auth.refresh_interval;
    let verifier = match TokenVerifier::new(config.auth.clone()) {
        Ok(verifier) => verifier,
        Err(e) => {
            error!(error = %e, "Failed to initialise token verifier");
            process::exit(1);
        }
    };

    let jwks = verifier.jwks().clone();
    match jwks.refresh().await {
        Ok(keys) => info!(keys = keys.len(), url = jwks.jwks_url(), "Signing keys loaded"),
        Err(e) => warn!(error = %e, "Signing keys unavailable at startup, fetching on demand"),
    }

    let shutdown = CancellationToken::new();
    let refresher = tokio::spawn(jwks.run_refresher(refresh_interval, shutdown.clone()));

    let app = router(AppState::new(CatalogStore::new(), verifier));

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind");
            process::exit(1);
        }
    };

    info!(%addr, audience = %config.auth.audience, "Casting agency API listening (docs at /docs)");

    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await;
    shutdown.cancel();
    if let Err(e) = refresher.await {
        warn!(error = %e, "JWKS refresher task failed");
    }

    if let Err(e) = serve {
        error!(error = %e, "Server error");
        process::exit(1);
    }
    info!("Server shutdown complete");
}

/// Resolve on Ctrl+C or SIGTERM, or when `shutdown` is cancelled elsewhere.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
        _ = shutdown.cancelled() => {}
    }
}
