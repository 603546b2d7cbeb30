// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Prompt relay core
//!
//! Forwards a user prompt to one of several external providers and returns
//! the answer as a `{"response": ...}` envelope.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Provider adapters, relay service and HTTP surface

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
