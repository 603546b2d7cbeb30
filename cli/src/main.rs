// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Prompt Relay
//!
//! The `prompt-relay` binary serves one POST endpoint per upstream provider
//! and answers every call with `{"response": "..."}`.
//!
//! ## Commands
//!
//! - `prompt-relay [serve]` - Run the HTTP relay (default)
//! - `prompt-relay config show|validate|generate` - Configuration management

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use prompt_relay::commands::{self, ConfigCommand, ServeArgs};
use prompt_relay::telemetry;
use relay_core::domain::relay_config::RelayConfigManifest;

/// Prompt Relay - forward prompts to LLM, webhook and Wikipedia providers
#[derive(Parser)]
#[command(name = "prompt-relay")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "RELAY_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Bind address (overrides spec.network.bind_address)
    #[arg(long, global = true, env = "RELAY_HOST")]
    host: Option<String>,

    /// HTTP API port (overrides spec.network.port)
    #[arg(long, global = true, env = "RELAY_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error); defaults to the config value
    #[arg(long, global = true, env = "RELAY_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP relay (default)
    #[command(name = "serve")]
    Serve,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials usually live in .env next to the binary
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { command }) => {
            telemetry::init_logging(cli.log_level.as_deref().unwrap_or("warn"), "text")?;
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Serve) | None => {
            let args = ServeArgs {
                host: cli.host,
                port: cli.port,
            };

            let config = RelayConfigManifest::load_or_default(cli.config)?;
            let logging = &config.spec.observability.logging;
            telemetry::init_logging(
                cli.log_level.as_deref().unwrap_or(&logging.level),
                &logging.format,
            )?;

            if let Ok(path) = dotenv {
                info!("Loaded environment from {}", path.display());
            }

            commands::serve::handle_command(args, config).await
        }
    }
}
