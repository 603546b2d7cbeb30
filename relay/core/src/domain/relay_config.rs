// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Relay Configuration Types
//
// Defines the configuration schema for a prompt relay process, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Listener and upstream network settings
// - Per-provider endpoints, models and credentials
// - Webhook session policy
// - Logging and metrics settings
//
// Every field has a working default, so a missing
// config file still yields a working process.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "relay/v1";
pub const KIND: &str = "RelayConfig";

/// Top-level relay configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfigManifest {
    /// API version (must be "relay/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "RelayConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: RelayConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable relay name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfigSpec {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Listener bind address (e.g. "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Timeout for each upstream call. Unset means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_timeout_secs: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
            upstream_timeout_secs: None,
        }
    }
}

/// One section per relay route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Backs `/api/chat1`
    #[serde(default = "default_groq", deserialize_with = "groq_section")]
    pub groq: ChatProviderConfig,

    /// Backs `/api/chat2`
    #[serde(default = "default_openrouter", deserialize_with = "openrouter_section")]
    pub openrouter: ChatProviderConfig,

    /// Backs `/api/chat3`
    #[serde(default = "default_ollama", deserialize_with = "ollama_section")]
    pub ollama: ChatProviderConfig,

    /// Backs `/api/image`
    #[serde(default)]
    pub wikipedia: WikipediaConfig,

    /// Backs `/api/text`
    #[serde(default)]
    pub webhook: WebhookConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            groq: default_groq(),
            openrouter: default_openrouter(),
            ollama: default_ollama(),
            wikipedia: WikipediaConfig::default(),
            webhook: WebhookConfig::default(),
        }
    }
}

/// Chat provider settings. A section only has to name the fields it changes;
/// the rest come from that provider's defaults.
#[derive(Debug, Clone, Serialize)]
pub struct ChatProviderConfig {
    /// Whether this provider is active
    pub enabled: bool,

    /// API base URL (the adapter appends its own path)
    pub endpoint: String,

    /// API key (supports "env:VAR_NAME" for environment variables)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier for the provider API
    pub model: String,
}

/// A chat provider section as written in YAML
#[derive(Debug, Default, Deserialize)]
struct ChatProviderSection {
    enabled: Option<bool>,
    endpoint: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
}

impl ChatProviderSection {
    fn over(self, base: ChatProviderConfig) -> ChatProviderConfig {
        ChatProviderConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            endpoint: self.endpoint.unwrap_or(base.endpoint),
            api_key: self.api_key.or(base.api_key),
            model: self.model.unwrap_or(base.model),
        }
    }
}

fn chat_section<'de, D>(
    deserializer: D,
    base: ChatProviderConfig,
) -> Result<ChatProviderConfig, D::Error>
where
    D: Deserializer<'de>,
{
    // `groq:` with an empty body deserializes as null
    let section = Option::<ChatProviderSection>::deserialize(deserializer)?;
    Ok(section.unwrap_or_default().over(base))
}

fn groq_section<'de, D: Deserializer<'de>>(d: D) -> Result<ChatProviderConfig, D::Error> {
    chat_section(d, default_groq())
}

fn openrouter_section<'de, D: Deserializer<'de>>(d: D) -> Result<ChatProviderConfig, D::Error> {
    chat_section(d, default_openrouter())
}

fn ollama_section<'de, D: Deserializer<'de>>(d: D) -> Result<ChatProviderConfig, D::Error> {
    chat_section(d, default_ollama())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// MediaWiki action API URL
    #[serde(default = "default_wikipedia_endpoint")]
    pub endpoint: String,

    /// Requested thumbnail width in pixels
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_wikipedia_endpoint(),
            thumbnail_size: default_thumbnail_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Full webhook URL
    #[serde(default = "default_webhook_url")]
    pub url: String,

    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_webhook_url(),
            session: SessionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub policy: SessionPolicy,

    /// Session identifier sent under the `shared` policy
    #[serde(default = "default_session_id")]
    pub id: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            policy: SessionPolicy::default(),
            id: default_session_id(),
        }
    }
}

/// How the webhook `sessionId` is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPolicy {
    /// Every caller shares one remote conversation
    #[default]
    Shared,
    /// A fresh UUID per relayed prompt
    PerRequest,
}

impl std::str::FromStr for SessionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shared" => Ok(SessionPolicy::Shared),
            "per-request" | "per_request" => Ok(SessionPolicy::PerRequest),
            other => Err(format!(
                "unknown session policy '{}', expected 'shared' or 'per-request'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Expose a Prometheus scrape endpoint
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    5000
}

fn default_groq() -> ChatProviderConfig {
    ChatProviderConfig {
        enabled: true,
        endpoint: "https://api.groq.com/openai/v1".to_string(),
        api_key: Some("env:GROQ_API_KEY".to_string()),
        model: "llama-3.3-70b-versatile".to_string(),
    }
}

fn default_openrouter() -> ChatProviderConfig {
    ChatProviderConfig {
        enabled: true,
        endpoint: "https://openrouter.ai/api/v1".to_string(),
        api_key: Some("env:OPENROUTER_API_KEY".to_string()),
        model: "deepseek/deepseek-r1:free".to_string(),
    }
}

fn default_ollama() -> ChatProviderConfig {
    ChatProviderConfig {
        enabled: true,
        endpoint: "http://localhost:11434".to_string(),
        api_key: None,
        model: "llama3.2".to_string(),
    }
}

fn default_wikipedia_endpoint() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_thumbnail_size() -> u32 {
    500
}

fn default_webhook_url() -> String {
    "https://adityarish.app.n8n.cloud/webhook/a011a4a7-4b48-4fd6-aaf3-7be82315a47f/chat".to_string()
}

fn default_session_id() -> String {
    "123".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for RelayConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "prompt-relay".to_string(),
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: RelayConfigSpec::default(),
        }
    }
}

impl RelayConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Candidate config paths, in precedence order (explicit path excluded)
    pub fn discovery_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("RELAY_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./relay-config.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".relay").join("config.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/relay/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\Relay\\config.yaml"));

        paths
    }

    /// Discover configuration file using precedence order
    /// 1. RELAY_CONFIG_PATH environment variable
    /// 2. ./relay-config.yaml (working directory)
    /// 3. ~/.relay/config.yaml (user home)
    /// 4. /etc/relay/config.yaml (system)
    pub fn discover_config() -> Option<PathBuf> {
        Self::discovery_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            Self::from_yaml_file(config_path)?
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("RELAY_WEBHOOK_URL") {
            tracing::info!("Environment override: RELAY_WEBHOOK_URL");
            self.spec.providers.webhook.url = url;
        }

        if let Ok(val) = std::env::var("RELAY_WEBHOOK_SESSION_POLICY") {
            match val.parse::<SessionPolicy>() {
                Ok(policy) => {
                    tracing::info!("Environment override: RELAY_WEBHOOK_SESSION_POLICY={:?}", policy);
                    self.spec.providers.webhook.session.policy = policy;
                }
                Err(e) => {
                    tracing::warn!("Invalid RELAY_WEBHOOK_SESSION_POLICY: {}. Ignoring.", e);
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if self.spec.network.port == 0 {
            anyhow::bail!("spec.network.port cannot be 0");
        }

        let providers = &self.spec.providers;
        for (name, chat) in [
            ("groq", &providers.groq),
            ("openrouter", &providers.openrouter),
            ("ollama", &providers.ollama),
        ] {
            if !chat.enabled {
                continue;
            }
            validate_url(name, &chat.endpoint)?;
            if chat.model.is_empty() {
                anyhow::bail!("Model identifier cannot be empty for provider: {}", name);
            }
        }

        if providers.wikipedia.enabled {
            validate_url("wikipedia", &providers.wikipedia.endpoint)?;
            if providers.wikipedia.thumbnail_size == 0 {
                anyhow::bail!("wikipedia.thumbnail_size must be greater than 0");
            }
        }

        if providers.webhook.enabled {
            validate_url("webhook", &providers.webhook.url)?;
            if providers.webhook.session.policy == SessionPolicy::Shared
                && providers.webhook.session.id.is_empty()
            {
                anyhow::bail!("webhook.session.id cannot be empty under the shared policy");
            }
        }

        Ok(())
    }
}

fn validate_url(provider: &str, value: &str) -> anyhow::Result<()> {
    if value.is_empty() {
        anyhow::bail!("Endpoint cannot be empty for provider: {}", provider);
    }
    url::Url::parse(value)
        .map_err(|e| anyhow::anyhow!("Invalid endpoint '{}' for provider {}: {}", value, provider, e))?;
    Ok(())
}
