// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Groq Provider Adapter (`/api/chat1`)
//
// Sends the prompt as a single user message behind a fixed instruction
// prefix and returns the model's text unchanged.

use super::openai::{chat_url, message, ChatCompletionResponse};
use crate::domain::provider::{
    Prompt, ProviderAdapter, ProviderError, ProviderRequest, RawResponse,
};
use serde_json::json;

pub const GROQ_INSTRUCTION: &str =
    "give small and quick replies like human to the user query, ";

pub struct GroqAdapter {
    endpoint: String,
    api_key: String,
    model: String,
}

impl GroqAdapter {
    pub fn new(endpoint: String, api_key: String, model: String) -> Self {
        Self {
            endpoint,
            api_key,
            model,
        }
    }
}

impl ProviderAdapter for GroqAdapter {
    fn name(&self) -> &str {
        "groq"
    }

    fn build_request(&self, prompt: &Prompt) -> Result<ProviderRequest, ProviderError> {
        let instruction = format!("{}{}", GROQ_INSTRUCTION, prompt);

        Ok(ProviderRequest::post(self.name(), chat_url(&self.endpoint))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(json!({
                "model": self.model,
                "messages": [message("user", &instruction)],
            })))
    }

    fn parse_response(&self, response: RawResponse) -> Result<String, ProviderError> {
        let response = response.error_for_status()?;
        let completion: ChatCompletionResponse = response.json()?;

        completion
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Schema("missing choices[0].message.content".into()))
    }
}
