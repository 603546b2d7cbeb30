// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::application::relay::RelayService;
use crate::domain::provider::{Prompt, RelayEnvelope, Route};

pub struct AppState {
    pub relay: Arc<RelayService>,
    pub started_at: Instant,
}

pub fn app(relay: Arc<RelayService>) -> Router {
    let state = Arc::new(AppState {
        relay,
        started_at: Instant::now(),
    });

    let mut router = Router::new().route("/health", get(health));

    for route in Route::ALL {
        router = router.route(
            route.path(),
            post(
                move |State(state): State<Arc<AppState>>, Json(payload): Json<RelayRequest>| async move {
                    relay_route(route, state, payload).await
                },
            ),
        );
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Incoming body. Only `message` is read; anything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    pub message: Option<Value>,
}

impl RelayRequest {
    /// Missing or null → empty prompt; non-string values keep their JSON text
    pub fn prompt(self) -> Prompt {
        match self.message {
            None | Some(Value::Null) => Prompt::default(),
            Some(Value::String(text)) => Prompt::new(text),
            Some(other) => Prompt::new(other.to_string()),
        }
    }
}

// Always 200: failures travel inside the envelope
async fn relay_route(
    route: Route,
    state: Arc<AppState>,
    payload: RelayRequest,
) -> Json<RelayEnvelope> {
    let prompt = payload.prompt();
    Json(state.relay.relay_envelope(route, &prompt).await)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let routes: Vec<&str> = state
        .relay
        .registry()
        .ready_routes()
        .iter()
        .map(|r| r.path())
        .collect();

    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.started_at.elapsed().as_secs(),
        "routes": routes,
    }))
}
