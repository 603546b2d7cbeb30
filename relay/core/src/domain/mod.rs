// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Layer (`relay-core`)
//!
//! Provider-independent types. Nothing here performs I/O.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`provider`] | `ProviderAdapter` capability, outbound request and raw response types |
//! | [`relay_config`] | YAML relay configuration manifest, discovery and validation |

pub mod provider;
pub mod relay_config;
