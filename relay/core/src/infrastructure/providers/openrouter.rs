// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// OpenRouter Provider Adapter (`/api/chat2`)
//
// Fitness-trainer persona with fixed sampling parameters. Only an exact
// 200 counts as success; any other status relays the raw upstream body.

use super::openai::{chat_url, message, ChatCompletionResponse};
use crate::domain::provider::{
    Prompt, ProviderAdapter, ProviderError, ProviderRequest, RawResponse,
};
use serde_json::json;
use tracing::debug;

pub const OPENROUTER_SYSTEM_PROMPT: &str = "You are an expert in fitness trainer. Give brief explaination in a human centric way. No need of much formating of the text. Give answer to the user query breifly.";

pub const TEMPERATURE: f64 = 0.8;
pub const TOP_P: f64 = 0.7;

/// Returned when a 200 response carries no message content
pub const EMPTY_COMPLETION: &str = "No response available";

pub struct OpenRouterAdapter {
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenRouterAdapter {
    pub fn new(endpoint: String, api_key: String, model: String) -> Self {
        Self {
            endpoint,
            api_key,
            model,
        }
    }
}

impl ProviderAdapter for OpenRouterAdapter {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn build_request(&self, prompt: &Prompt) -> Result<ProviderRequest, ProviderError> {
        Ok(ProviderRequest::post(self.name(), chat_url(&self.endpoint))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(json!({
                "model": self.model,
                "messages": [
                    message("system", OPENROUTER_SYSTEM_PROMPT),
                    message("user", prompt.as_str()),
                ],
                "temperature": TEMPERATURE,
                "top_p": TOP_P,
            })))
    }

    fn parse_response(&self, response: RawResponse) -> Result<String, ProviderError> {
        if response.status != 200 {
            return Err(ProviderError::Status {
                status: response.status,
                body: response.body,
            });
        }

        let completion: ChatCompletionResponse = response.json()?;
        debug!(
            finish_reason = completion.first_finish_reason().unwrap_or(""),
            "OpenRouter completion received"
        );

        Ok(completion
            .first_content()
            .unwrap_or(EMPTY_COMPLETION)
            .trim()
            .to_string())
    }
}
