// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Provider Registry - Route Resolution and Provider Management
//
// Built once at start-up from the relay configuration. Each route owns a
// slot that is either a ready adapter or the reason it cannot serve.

use crate::domain::provider::{ProviderAdapter, ProviderError, Route};
use crate::domain::relay_config::{ChatProviderConfig, RelayConfigManifest};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::groq::GroqAdapter;
use super::ollama::OllamaAdapter;
use super::openrouter::OpenRouterAdapter;
use super::webhook::WebhookAdapter;
use super::wikipedia::WikipediaAdapter;

pub enum ProviderSlot {
    Ready(Arc<dyn ProviderAdapter>),
    Unavailable { provider: String, reason: String },
}

/// Registry mapping relay routes to provider adapters
#[derive(Default)]
pub struct ProviderRegistry {
    slots: BTreeMap<Route, ProviderSlot>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create provider registry from relay configuration
    pub fn from_config(config: &RelayConfigManifest) -> anyhow::Result<Self> {
        config.validate()?;

        info!("Initializing provider registry");

        let providers = &config.spec.providers;
        let mut registry = Self::new();

        registry.insert_slot(
            Route::Chat1,
            chat_slot("groq", &providers.groq, |c, key| {
                Arc::new(GroqAdapter::new(c.endpoint.clone(), key, c.model.clone()))
            }),
        );

        registry.insert_slot(
            Route::Chat2,
            chat_slot("openrouter", &providers.openrouter, |c, key| {
                Arc::new(OpenRouterAdapter::new(c.endpoint.clone(), key, c.model.clone()))
            }),
        );

        registry.insert_slot(
            Route::Chat3,
            chat_slot("ollama", &providers.ollama, |c, _| {
                Arc::new(OllamaAdapter::new(c.endpoint.clone(), c.model.clone()))
            }),
        );

        let wikipedia = &providers.wikipedia;
        registry.insert_slot(
            Route::Image,
            if wikipedia.enabled {
                ProviderSlot::Ready(Arc::new(WikipediaAdapter::new(
                    wikipedia.endpoint.clone(),
                    wikipedia.thumbnail_size,
                )))
            } else {
                disabled("wikipedia")
            },
        );

        let webhook = &providers.webhook;
        registry.insert_slot(
            Route::Text,
            if webhook.enabled {
                info!("Webhook session policy: {:?}", webhook.session.policy);
                ProviderSlot::Ready(Arc::new(WebhookAdapter::new(
                    webhook.url.clone(),
                    webhook.session.policy,
                    webhook.session.id.clone(),
                )))
            } else {
                disabled("webhook")
            },
        );

        if registry.ready_routes().is_empty() {
            warn!("No providers available - every route will answer with an error");
        }

        Ok(registry)
    }

    /// Install (or replace) an adapter for a route
    pub fn register(&mut self, route: Route, adapter: Arc<dyn ProviderAdapter>) {
        self.insert_slot(route, ProviderSlot::Ready(adapter));
    }

    fn insert_slot(&mut self, route: Route, slot: ProviderSlot) {
        match &slot {
            ProviderSlot::Ready(adapter) => {
                info!("Mapping route '{}' -> {}", route.path(), adapter.name())
            }
            ProviderSlot::Unavailable { provider, reason } => warn!(
                "Route '{}' unavailable ({}): {}",
                route.path(),
                provider,
                reason
            ),
        }
        self.slots.insert(route, slot);
    }

    /// Adapter serving a route, or why there is none
    pub fn resolve(&self, route: Route) -> Result<&dyn ProviderAdapter, ProviderError> {
        match self.slots.get(&route) {
            Some(ProviderSlot::Ready(adapter)) => Ok(adapter.as_ref()),
            Some(ProviderSlot::Unavailable { provider, reason }) => {
                Err(ProviderError::not_configured(provider.as_str(), reason.as_str()))
            }
            None => Err(ProviderError::not_configured(
                route.key(),
                "no provider registered for this route",
            )),
        }
    }

    pub fn has_route(&self, route: Route) -> bool {
        matches!(self.slots.get(&route), Some(ProviderSlot::Ready(_)))
    }

    /// Routes with a ready adapter, in declaration order
    pub fn ready_routes(&self) -> Vec<Route> {
        self.slots
            .iter()
            .filter(|(_, slot)| matches!(slot, ProviderSlot::Ready(_)))
            .map(|(route, _)| *route)
            .collect()
    }

    /// Resolve API key from config (supports "env:VAR_NAME" syntax)
    pub fn resolve_api_key(key: &Option<String>) -> anyhow::Result<String> {
        match key {
            Some(k) => match k.strip_prefix("env:") {
                Some(var_name) => std::env::var(var_name)
                    .map_err(|_| anyhow::anyhow!("Environment variable not set: {}", var_name)),
                None => Ok(k.clone()),
            },
            None => Ok(String::new()), // For local providers without auth
        }
    }
}

fn disabled(provider: &str) -> ProviderSlot {
    ProviderSlot::Unavailable {
        provider: provider.to_string(),
        reason: "disabled in configuration".to_string(),
    }
}

fn chat_slot(
    provider: &str,
    config: &ChatProviderConfig,
    build: impl FnOnce(&ChatProviderConfig, String) -> Arc<dyn ProviderAdapter>,
) -> ProviderSlot {
    if !config.enabled {
        return disabled(provider);
    }

    match ProviderRegistry::resolve_api_key(&config.api_key) {
        Ok(key) => ProviderSlot::Ready(build(config, key)),
        Err(e) => ProviderSlot::Unavailable {
            provider: provider.to_string(),
            reason: e.to_string(),
        },
    }
}
