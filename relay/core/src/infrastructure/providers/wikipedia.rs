// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Wikipedia Image Adapter (`/api/image`)
//
// Looks the prompt up as a page title and returns the first page's
// thumbnail URL: query.pages -> first value -> thumbnail.source.

use crate::domain::provider::{
    Prompt, ProviderAdapter, ProviderError, ProviderRequest, RawResponse,
};
use serde_json::Value;

pub struct WikipediaAdapter {
    endpoint: String,
    thumbnail_size: u32,
}

impl WikipediaAdapter {
    pub fn new(endpoint: String, thumbnail_size: u32) -> Self {
        Self {
            endpoint,
            thumbnail_size,
        }
    }
}

impl ProviderAdapter for WikipediaAdapter {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn build_request(&self, prompt: &Prompt) -> Result<ProviderRequest, ProviderError> {
        Ok(ProviderRequest::get(self.name(), self.endpoint.clone())
            .query("action", "query")
            .query("titles", prompt.as_str())
            .query("prop", "pageimages")
            .query("format", "json")
            .query("pithumbsize", self.thumbnail_size.to_string()))
    }

    fn parse_response(&self, response: RawResponse) -> Result<String, ProviderError> {
        let response = response.error_for_status()?;
        let data: Value = response.json()?;

        let pages = data
            .get("query")
            .and_then(|q| q.get("pages"))
            .and_then(Value::as_object)
            .ok_or_else(|| ProviderError::Schema("missing query.pages".into()))?;

        // Document order; serde_json is built with preserve_order
        let first_page = pages
            .values()
            .next()
            .ok_or_else(|| ProviderError::Schema("query.pages is empty".into()))?;

        let thumbnail = first_page
            .get("thumbnail")
            .ok_or_else(|| ProviderError::Schema("page has no thumbnail".into()))?;

        thumbnail
            .get("source")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Schema("thumbnail has no source".into()))
    }
}
