// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Application Layer (`relay-core`)
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`relay`] | `RelayService`: resolve → build → send → parse for one route |

pub mod relay;

pub use relay::RelayService;
