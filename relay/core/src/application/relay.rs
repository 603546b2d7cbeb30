// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Relay Service
//!
//! Runs one prompt through the adapter registered for a route and the
//! shared transport.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrates adapter and transport; owns per-call logging and metrics

use crate::domain::provider::{Prompt, ProviderAdapter, ProviderError, RelayEnvelope, Route};
use crate::infrastructure::providers::ProviderRegistry;
use crate::infrastructure::transport::HttpTransport;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub struct RelayService {
    registry: Arc<ProviderRegistry>,
    transport: Arc<dyn HttpTransport>,
}

impl RelayService {
    pub fn new(registry: Arc<ProviderRegistry>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            registry,
            transport,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Relay a prompt to the provider behind `route`
    pub async fn relay(&self, route: Route, prompt: &Prompt) -> Result<String, ProviderError> {
        let started = Instant::now();
        let (provider, outcome) = self.dispatch(route, prompt).await;
        let elapsed = started.elapsed();

        match &outcome {
            Ok(text) => {
                info!(
                    route = route.key(),
                    provider = %provider,
                    elapsed_ms = elapsed.as_millis() as u64,
                    response_len = text.len(),
                    "Relay succeeded"
                );
            }
            Err(e) => {
                warn!(
                    route = route.key(),
                    provider = %provider,
                    elapsed_ms = elapsed.as_millis() as u64,
                    kind = e.kind(),
                    error = %e,
                    "Relay failed"
                );
            }
        }

        let outcome_label = match &outcome {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::counter!(
            "relay_requests_total",
            "provider" => provider.clone(),
            "outcome" => outcome_label
        )
        .increment(1);
        metrics::histogram!("relay_request_duration_seconds", "provider" => provider)
            .record(elapsed.as_secs_f64());

        outcome
    }

    /// Relay and fold the outcome into the in-band envelope
    pub async fn relay_envelope(&self, route: Route, prompt: &Prompt) -> RelayEnvelope {
        self.relay(route, prompt).await.into()
    }

    /// Resolve the route once and run the call; returns the provider label with the outcome
    async fn dispatch(
        &self,
        route: Route,
        prompt: &Prompt,
    ) -> (String, Result<String, ProviderError>) {
        match self.registry.resolve(route) {
            Ok(adapter) => (adapter.name().to_string(), self.call(adapter, prompt).await),
            Err(e) => {
                let provider = match &e {
                    ProviderError::NotConfigured { provider, .. } => provider.clone(),
                    _ => route.key().to_string(),
                };
                (provider, Err(e))
            }
        }
    }

    async fn call(
        &self,
        adapter: &dyn ProviderAdapter,
        prompt: &Prompt,
    ) -> Result<String, ProviderError> {
        let request = adapter.build_request(prompt)?;
        let response = self.transport.send(request).await?;
        adapter.parse_response(response)
    }
}
