// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`relay-core`)
//!
//! HTTP surface that translates incoming requests into relay service calls.
//! **No provider logic lives here**. All real work is delegated to
//! `crate::application::relay`.
//!
//! | Module | Transport | Description |
//! |--------|-----------|-------------|
//! | [`api`] | HTTP (Axum) | One POST route per provider plus `/health` |

pub mod api;
