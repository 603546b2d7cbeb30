// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Relay Infrastructure
//
// Provider adapters (the wire formats of each upstream) and the HTTP
// transport that carries their requests.

pub mod providers;
pub mod transport;

pub use providers::ProviderRegistry;
pub use transport::{HttpTransport, ReqwestTransport};
