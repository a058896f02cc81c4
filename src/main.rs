// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::sync::Arc;

use axum::http::HeaderValue;
use bookshelf_server::{
    api::{cors_layer, router},
    auth::TokenService,
    config::AppConfig,
    state::AppState,
    storage::UserDatabase,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = AppConfig::from_env();
    init_tracing(config.as_ref().map(|c| c.log_format).unwrap_or_default());

    // The signing secret is mandatory; refuse to start without it
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let database_path = config.database_path();
    let users = UserDatabase::open(&database_path)?;
    tracing::info!(path = %database_path.display(), "User database opened");

    let tokens = Arc::new(TokenService::new(&config.signing_secret));
    let state = AppState::new(Arc::new(users), tokens);

    let origin = HeaderValue::from_str(&config.client_origin)?;
    let app = router(state, cors_layer(origin));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        client_origin = %config.client_origin,
        "Bookshelf server listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
