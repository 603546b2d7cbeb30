// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Provider
//!
//! Domain interface for the external services a prompt can be relayed to.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Anti-Corruption Layer between the relay and vendor APIs
//!
//! An adapter never talks to the network itself. It turns a [`Prompt`] into a
//! [`ProviderRequest`] and a [`RawResponse`] back into text; the transport in
//! `infrastructure::transport` sits between the two.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by every failure envelope.
pub const ERROR_PREFIX: &str = "Error: ";

/// The user's raw message, before any provider-specific formatting.
///
/// No length or content validation is applied. A missing message is the
/// empty prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// Outbound call to a provider, built fresh for every relayed prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Name of the adapter that built the request
    pub provider: String,
    pub method: HttpMethod,
    pub url: String,
    /// Headers in insertion order
    pub headers: Vec<(String, String)>,
    /// Query parameters, URL-encoded by the transport
    pub query: Vec<(String, String)>,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
}

impl ProviderRequest {
    pub fn get(provider: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_method(provider, HttpMethod::Get, url)
    }

    pub fn post(provider: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_method(provider, HttpMethod::Post, url)
    }

    fn with_method(provider: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {}", token))
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Case-insensitive header lookup
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Upstream answer exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with [`ProviderError::Status`] unless the status is 2xx
    pub fn error_for_status(self) -> Result<Self, ProviderError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ProviderError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Decode the body as JSON, reporting a shape mismatch on failure
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ProviderError> {
        serde_json::from_str(&self.body)
            .map_err(|e| ProviderError::Schema(format!("invalid JSON body: {}", e)))
    }
}

/// Failures a provider call can legitimately run into.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Connection, DNS, TLS or timeout failure
    #[error("{0}")]
    Transport(String),

    /// Upstream answered with a non-success status
    #[error("{}", status_detail(.status, .body))]
    Status { status: u16, body: String },

    /// Upstream body did not have the expected shape
    #[error("unexpected response shape: {0}")]
    Schema(String),

    /// The adapter has no usable local state (disabled, missing credential)
    #[error("provider '{provider}' is not configured: {reason}")]
    NotConfigured { provider: String, reason: String },
}

impl ProviderError {
    /// Stable label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Transport(_) => "transport",
            ProviderError::Status { .. } => "status",
            ProviderError::Schema(_) => "schema",
            ProviderError::NotConfigured { .. } => "not_configured",
        }
    }

    pub fn not_configured(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        ProviderError::NotConfigured {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

fn status_detail(status: &u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        body.to_string()
    }
}

/// JSON body returned by every relay route.
///
/// Failures are signalled in-band: `response` starts with [`ERROR_PREFIX`]
/// and the HTTP status stays 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEnvelope {
    pub response: String,
}

impl RelayEnvelope {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            response: text.into(),
        }
    }

    pub fn failure(error: &ProviderError) -> Self {
        Self {
            response: format!("{}{}", ERROR_PREFIX, error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.response.starts_with(ERROR_PREFIX)
    }
}

impl From<Result<String, ProviderError>> for RelayEnvelope {
    fn from(outcome: Result<String, ProviderError>) -> Self {
        match outcome {
            Ok(text) => RelayEnvelope::success(text),
            Err(e) => RelayEnvelope::failure(&e),
        }
    }
}

/// Relay routes, one per provider slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Route {
    Chat1,
    Chat2,
    Chat3,
    Image,
    Text,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Chat1,
        Route::Chat2,
        Route::Chat3,
        Route::Image,
        Route::Text,
    ];

    /// Last path segment, e.g. "chat1"
    pub fn key(&self) -> &'static str {
        match self {
            Route::Chat1 => "chat1",
            Route::Chat2 => "chat2",
            Route::Chat3 => "chat3",
            Route::Image => "image",
            Route::Text => "text",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Chat1 => "/api/chat1",
            Route::Chat2 => "/api/chat2",
            Route::Chat3 => "/api/chat3",
            Route::Image => "/api/image",
            Route::Text => "/api/text",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Capability "send prompt, receive text", split into its two pure halves.
pub trait ProviderAdapter: Send + Sync {
    /// Adapter name used in logs and error messages (e.g. "groq")
    fn name(&self) -> &str;

    /// Translate the prompt into this provider's wire format
    fn build_request(&self, prompt: &Prompt) -> Result<ProviderRequest, ProviderError>;

    /// Translate this provider's answer into plain text
    fn parse_response(&self, response: RawResponse) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_uses_body_when_present() {
        let err = ProviderError::Status {
            status: 500,
            body: "{\"error\":\"boom\"}".to_string(),
        };
        assert_eq!(err.to_string(), "{\"error\":\"boom\"}");

        let empty = ProviderError::Status {
            status: 404,
            body: "  ".to_string(),
        };
        assert_eq!(empty.to_string(), "HTTP 404");
    }

    #[test]
    fn test_envelope_from_outcome() {
        let ok: RelayEnvelope = Ok::<_, ProviderError>("hello".to_string()).into();
        assert_eq!(ok.response, "hello");
        assert!(!ok.is_error());

        let err: RelayEnvelope =
            Err::<String, _>(ProviderError::not_configured("ollama", "disabled")).into();
        assert_eq!(
            err.response,
            "Error: provider 'ollama' is not configured: disabled"
        );
        assert!(err.is_error());
    }

    #[test]
    fn test_error_for_status() {
        assert!(RawResponse::new(204, "").error_for_status().is_ok());
        let err = RawResponse::new(502, "bad gateway").error_for_status().unwrap_err();
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn test_request_builder_lookups() {
        let req = ProviderRequest::get("wikipedia", "https://example.org")
            .header("Content-Type", "application/json")
            .query("titles", "Rust");

        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.header_value("content-type"), Some("application/json"));
        assert_eq!(req.query_value("titles"), Some("Rust"));
        assert!(req.body.is_none());
    }
}
