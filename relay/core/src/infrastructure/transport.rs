// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// HTTP Transport
//
// Executes a ProviderRequest and hands back the raw status and body.
// Adapters never see reqwest types.

use crate::domain::provider::{HttpMethod, ProviderError, ProviderRequest, RawResponse};
use async_trait::async_trait;
use std::error::Error as _;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ProviderRequest) -> Result<RawResponse, ProviderError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a pooled client. `None` leaves upstream calls without a timeout.
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("prompt-relay/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ProviderRequest) -> Result<RawResponse, ProviderError> {
        debug!(
            provider = %request.provider,
            method = %request.method,
            url = %request.url,
            "Sending upstream request"
        );

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::Transport(describe(&e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(describe(&e)))?;

        Ok(RawResponse { status, body })
    }
}

// reqwest's top-level message hides the underlying cause (refused, DNS, ...)
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport = ReqwestTransport::new(Some(Duration::from_secs(2))).unwrap();
        let request = ProviderRequest::get("test", "http://127.0.0.1:1/unreachable");

        let err = transport.send(request).await.unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert!(!err.to_string().is_empty());
    }
}
