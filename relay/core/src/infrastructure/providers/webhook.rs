// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Workflow Webhook Adapter (`/api/text`)
//
// Posts `{chatInput, sessionId}` to an automation webhook and relays the
// raw body text. The body is not JSON-decoded.

use crate::domain::provider::{
    Prompt, ProviderAdapter, ProviderError, ProviderRequest, RawResponse,
};
use crate::domain::relay_config::SessionPolicy;
use serde_json::json;

pub const WEBHOOK_INSTRUCTION: &str = "tell about this topic in points, ";

pub struct WebhookAdapter {
    url: String,
    policy: SessionPolicy,
    shared_session_id: String,
}

impl WebhookAdapter {
    pub fn new(url: String, policy: SessionPolicy, shared_session_id: String) -> Self {
        Self {
            url,
            policy,
            shared_session_id,
        }
    }

    fn session_id(&self) -> String {
        match self.policy {
            SessionPolicy::Shared => self.shared_session_id.clone(),
            SessionPolicy::PerRequest => uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl ProviderAdapter for WebhookAdapter {
    fn name(&self) -> &str {
        "webhook"
    }

    fn build_request(&self, prompt: &Prompt) -> Result<ProviderRequest, ProviderError> {
        Ok(ProviderRequest::post(self.name(), self.url.clone())
            .header("Content-Type", "application/json")
            .json(json!({
                "chatInput": format!("{}{}", WEBHOOK_INSTRUCTION, prompt),
                "sessionId": self.session_id(),
            })))
    }

    fn parse_response(&self, response: RawResponse) -> Result<String, ProviderError> {
        Ok(response.error_for_status()?.body)
    }
}
