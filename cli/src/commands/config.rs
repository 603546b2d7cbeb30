// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use relay_core::domain::provider::Route;
use relay_core::domain::relay_config::{ChatProviderConfig, RelayConfigManifest};

pub const MINIMAL_TEMPLATE: &str = include_str!("../../templates/config-minimal.yaml");
pub const EXAMPLES_TEMPLATE: &str = include_str!("../../templates/config-with-examples.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./relay-config.yaml)
        #[arg(short, long, default_value = "./relay-config.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate {
            output,
            examples,
            force,
        } => generate(&output, examples, force).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = RelayConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  1. --config flag: {}", path.display()),
            None => println!("  1. --config flag: {}", "(not set)".dimmed()),
        }
        for (i, path) in RelayConfigManifest::discovery_paths().iter().enumerate() {
            let marker = if path.exists() { "found".green() } else { "missing".dimmed() };
            println!("  {}. {} ({})", i + 2, path.display(), marker);
        }
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!("  Name: {}", config.metadata.name);
    println!(
        "  Listen: {}:{}",
        config.spec.network.bind_address, config.spec.network.port
    );
    match config.spec.network.upstream_timeout_secs {
        Some(secs) => println!("  Upstream timeout: {}s", secs),
        None => println!("  Upstream timeout: {}", "(none)".dimmed()),
    }
    println!();

    let providers = &config.spec.providers;
    println!("{}", "Routes:".bold());
    print_chat(Route::Chat1, "groq", &providers.groq);
    print_chat(Route::Chat2, "openrouter", &providers.openrouter);
    print_chat(Route::Chat3, "ollama", &providers.ollama);
    println!(
        "  {} → {} {} (thumbnail {}px){}",
        Route::Image.path(),
        "wikipedia".bold(),
        providers.wikipedia.endpoint,
        providers.wikipedia.thumbnail_size,
        enabled_marker(providers.wikipedia.enabled)
    );
    println!(
        "  {} → {} {} (session: {:?}){}",
        Route::Text.path(),
        "webhook".bold(),
        providers.webhook.url,
        providers.webhook.session.policy,
        enabled_marker(providers.webhook.enabled)
    );
    println!();

    Ok(())
}

fn print_chat(route: Route, name: &str, provider: &ChatProviderConfig) {
    println!(
        "  {} → {} {} (model {}){}",
        route.path(),
        name.bold(),
        provider.endpoint,
        provider.model,
        enabled_marker(provider.enabled)
    );
}

fn enabled_marker(enabled: bool) -> String {
    if enabled {
        String::new()
    } else {
        format!(" {}", "[disabled]".yellow())
    }
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = RelayConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: &Path, with_examples: bool, force: bool) -> Result<()> {
    write_template(output, with_examples, force)?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

fn write_template(output: &Path, with_examples: bool, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let sample = if with_examples {
        EXAMPLES_TEMPLATE
    } else {
        MINIMAL_TEMPLATE
    };

    std::fs::write(output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))
}
