// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Ollama Provider Adapter (`/api/chat3`)
//
// Local model behind the Ollama chat API. Business-management persona,
// non-streaming.

use crate::domain::provider::{
    Prompt, ProviderAdapter, ProviderError, ProviderRequest, RawResponse,
};
use serde::Deserialize;
use serde_json::json;

pub const OLLAMA_SYSTEM_PROMPT: &str = "You are an expert in business management. Give brief explaination and put it out in points.";

pub struct OllamaAdapter {
    endpoint: String,
    model: String,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: String,
}

impl OllamaAdapter {
    pub fn new(endpoint: String, model: String) -> Self {
        Self { endpoint, model }
    }
}

impl ProviderAdapter for OllamaAdapter {
    fn name(&self) -> &str {
        "ollama"
    }

    fn build_request(&self, prompt: &Prompt) -> Result<ProviderRequest, ProviderError> {
        let url = format!("{}/api/chat", self.endpoint.trim_end_matches('/'));

        Ok(ProviderRequest::post(self.name(), url).json(json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": OLLAMA_SYSTEM_PROMPT },
                { "role": "user", "content": prompt.as_str() },
            ],
            "stream": false,
        })))
    }

    fn parse_response(&self, response: RawResponse) -> Result<String, ProviderError> {
        let response = response.error_for_status()?;
        let chat: OllamaChatResponse = response.json()?;

        chat.message
            .map(|m| m.content)
            .ok_or_else(|| ProviderError::Schema("missing message.content".into()))
    }
}
