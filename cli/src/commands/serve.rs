// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `serve` command: run the HTTP relay in the foreground

use anyhow::{Context, Result};
use relay_core::domain::relay_config::RelayConfigManifest;

use crate::server;

/// Listener overrides taken from the command line
#[derive(Debug, Default, Clone)]
pub struct ServeArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut RelayConfigManifest) {
        if let Some(host) = &self.host {
            config.spec.network.bind_address = host.clone();
        }
        if let Some(port) = self.port {
            config.spec.network.port = port;
        }
    }
}

pub async fn handle_command(args: ServeArgs, mut config: RelayConfigManifest) -> Result<()> {
    args.apply(&mut config);

    config
        .validate()
        .context("Configuration validation failed")?;

    server::start_server(config).await
}
