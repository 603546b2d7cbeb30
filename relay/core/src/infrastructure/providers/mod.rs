// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Provider Infrastructure - Anti-Corruption Layer Implementations
//
// Each adapter translates between the relay's Prompt/text pair and one
// external API. The registry maps relay routes to adapters.

pub mod openai;
pub mod groq;
pub mod openrouter;
pub mod ollama;
pub mod wikipedia;
pub mod webhook;
pub mod registry;

pub use registry::{ProviderRegistry, ProviderSlot};
