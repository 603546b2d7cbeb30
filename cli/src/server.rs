// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Relay HTTP server implementation

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use relay_core::{
    application::relay::RelayService,
    domain::relay_config::RelayConfigManifest,
    infrastructure::{providers::ProviderRegistry, transport::ReqwestTransport},
    presentation::api::app,
};

use crate::telemetry;

pub async fn start_server(config: RelayConfigManifest) -> Result<()> {
    info!("Prompt relay '{}' starting (PID: {})", config.metadata.name, std::process::id());

    let registry = Arc::new(
        ProviderRegistry::from_config(&config).context("Failed to initialize providers")?,
    );

    let network = &config.spec.network;
    let timeout = network.upstream_timeout_secs.map(Duration::from_secs);
    match timeout {
        Some(t) => info!("Upstream timeout: {:?}", t),
        None => info!("Upstream timeout: none"),
    }
    let transport = Arc::new(ReqwestTransport::new(timeout).context("Failed to build HTTP client")?);

    let relay = Arc::new(RelayService::new(registry, transport));

    let metrics = &config.spec.observability.metrics;
    if metrics.enabled {
        let metrics_addr: SocketAddr = format!("{}:{}", network.bind_address, metrics.port)
            .parse()
            .with_context(|| format!("Invalid metrics address {}:{}", network.bind_address, metrics.port))?;
        telemetry::install_metrics_exporter(metrics_addr)?;
    }

    let router = app(relay);

    let addr = format!("{}:{}", network.bind_address, network.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Relay listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Relay shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
