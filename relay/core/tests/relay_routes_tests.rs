// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end tests for the relay routes.
//!
//! Each test starts a mockito server standing in for the upstream provider,
//! points the relay configuration at it and drives the axum router with
//! `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use mockito::{Matcher, Server};
use relay_core::application::relay::RelayService;
use relay_core::domain::relay_config::{RelayConfigManifest, SessionPolicy};
use relay_core::infrastructure::providers::ProviderRegistry;
use relay_core::infrastructure::transport::ReqwestTransport;
use relay_core::presentation::api::app;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Configuration with every provider pointed at the mock server
fn config_for(base_url: &str) -> RelayConfigManifest {
    let mut config = RelayConfigManifest::default();
    let providers = &mut config.spec.providers;

    providers.groq.endpoint = format!("{}/openai/v1", base_url);
    providers.groq.api_key = Some("gsk-test".to_string());
    providers.openrouter.endpoint = format!("{}/api/v1", base_url);
    providers.openrouter.api_key = Some("sk-or-test".to_string());
    providers.ollama.endpoint = base_url.to_string();
    providers.wikipedia.endpoint = format!("{}/w/api.php", base_url);
    providers.webhook.url = format!("{}/webhook/chat", base_url);

    config
}

fn router(config: &RelayConfigManifest) -> Router {
    let registry = ProviderRegistry::from_config(config).expect("valid test config");
    let transport = ReqwestTransport::new(None).expect("http client");
    app(Arc::new(RelayService::new(Arc::new(registry), Arc::new(transport))))
}

async fn post(router: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_chat1_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/openai/v1/chat/completions")
        .match_header("authorization", "Bearer gsk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama-3.3-70b-versatile",
            "messages": [{
                "role": "user",
                "content": "give small and quick replies like human to the user query, hey there"
            }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hey! What's up?"},"finish_reason":"stop"}]}"#)
        .create_async()
        .await;

    let (status, body) = post(
        router(&config_for(&server.url())),
        "/api/chat1",
        json!({"message": "hey there"}),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "Hey! What's up?"}));
}

#[tokio::test]
async fn test_chat1_upstream_failure_stays_in_band() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/openai/v1/chat/completions")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let (status, body) = post(
        router(&config_for(&server.url())),
        "/api/chat1",
        json!({"message": "hey"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "Error: internal error"}));
}

#[tokio::test]
async fn test_chat2_success_is_trimmed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/chat/completions")
        .match_header("authorization", "Bearer sk-or-test")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model": "deepseek/deepseek-r1:free",
            "temperature": 0.8,
            "top_p": 0.7
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"\n\nStretch first.  "},"finish_reason":"stop"}]}"#)
        .create_async()
        .await;

    let (status, body) = post(
        router(&config_for(&server.url())),
        "/api/chat2",
        json!({"message": "how do I start running?"}),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Stretch first.");
}

#[tokio::test]
async fn test_chat2_error_statuses_relay_body() {
    for (code, upstream) in [(404, r#"{"error":"model not found"}"#), (500, "boom")] {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/v1/chat/completions")
            .with_status(code)
            .with_body(upstream)
            .create_async()
            .await;

        let (status, body) = post(
            router(&config_for(&server.url())),
            "/api/chat2",
            json!({"message": "hi"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], format!("Error: {}", upstream));
    }
}

#[tokio::test]
async fn test_chat2_missing_message_sends_empty_prompt() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "messages": [
                {
                    "role": "system",
                    "content": "You are an expert in fitness trainer. Give brief explaination in a human centric way. No need of much formating of the text. Give answer to the user query breifly."
                },
                { "role": "user", "content": "" }
            ]
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"Ask me anything."}}]}"#)
        .create_async()
        .await;

    let (status, body) = post(router(&config_for(&server.url())), "/api/chat2", json!({})).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Ask me anything.");
}

#[tokio::test]
async fn test_chat3_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama3.2",
            "stream": false
        })))
        .with_status(200)
        .with_body(r#"{"model":"llama3.2","message":{"role":"assistant","content":"- Cut costs\n- Grow revenue"},"done":true}"#)
        .create_async()
        .await;

    let (status, body) = post(
        router(&config_for(&server.url())),
        "/api/chat3",
        json!({"message": "how do I scale?"}),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "- Cut costs\n- Grow revenue");
}

#[tokio::test]
async fn test_chat3_error_statuses_relay_body() {
    for (code, upstream) in [(404, r#"{"error":"model 'llama3.2' not found"}"#), (500, "ollama crashed")] {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .with_status(code)
            .with_body(upstream)
            .create_async()
            .await;

        let (status, body) = post(
            router(&config_for(&server.url())),
            "/api/chat3",
            json!({"message": "hi"}),
        )
        .await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], format!("Error: {}", upstream));
    }
}

#[tokio::test]
async fn test_chat3_disabled_reports_not_configured() {
    let server = Server::new_async().await;
    let mut config = config_for(&server.url());
    config.spec.providers.ollama.enabled = false;

    let (status, body) = post(router(&config), "/api/chat3", json!({"message": "hi"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "Error: provider 'ollama' is not configured: disabled in configuration"
    );
}

fn wikipedia_query(title: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("action".into(), "query".into()),
        Matcher::UrlEncoded("titles".into(), title.into()),
        Matcher::UrlEncoded("prop".into(), "pageimages".into()),
        Matcher::UrlEncoded("format".into(), "json".into()),
        Matcher::UrlEncoded("pithumbsize".into(), "500".into()),
    ])
}

#[tokio::test]
async fn test_image_returns_thumbnail_source() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/w/api.php")
        .match_query(wikipedia_query("Albert Einstein"))
        .with_status(200)
        .with_body(r#"{"batchcomplete":"","query":{"pages":{"123":{"pageid":123,"title":"Albert Einstein","thumbnail":{"source":"X","width":500,"height":600}}}}}"#)
        .create_async()
        .await;

    let (status, body) = post(
        router(&config_for(&server.url())),
        "/api/image",
        json!({"message": "Albert Einstein"}),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "X"}));
}

#[tokio::test]
async fn test_image_error_statuses_relay_body() {
    for (code, upstream) in [(404, "Not Found"), (500, r#"{"error":{"code":"internal_api_error"}}"#)] {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/w/api.php")
            .match_query(wikipedia_query("Albert Einstein"))
            .with_status(code)
            .with_body(upstream)
            .create_async()
            .await;

        let (status, body) = post(
            router(&config_for(&server.url())),
            "/api/image",
            json!({"message": "Albert Einstein"}),
        )
        .await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], format!("Error: {}", upstream));
    }
}

#[tokio::test]
async fn test_image_without_thumbnail_is_error_string() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/w/api.php")
        .match_query(wikipedia_query("Nonexistent page"))
        .with_status(200)
        .with_body(r#"{"query":{"pages":{"-1":{"ns":0,"title":"Nonexistent page","missing":""}}}}"#)
        .create_async()
        .await;

    let (status, body) = post(
        router(&config_for(&server.url())),
        "/api/image",
        json!({"message": "Nonexistent page"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "Error: unexpected response shape: page has no thumbnail"
    );
}

#[tokio::test]
async fn test_text_shared_session_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/webhook/chat")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "chatInput": "tell about this topic in points, volcanoes",
            "sessionId": "123"
        })))
        .with_status(200)
        .with_body(r#"{"output":"1. Magma"}"#)
        .expect(2)
        .create_async()
        .await;

    let config = config_for(&server.url());
    for _caller in 0..2 {
        let (status, body) =
            post(router(&config), "/api/text", json!({"message": "volcanoes"})).await;

        assert_eq!(status, StatusCode::OK);
        // raw body, not decoded
        assert_eq!(body["response"], r#"{"output":"1. Magma"}"#);
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_text_per_request_session_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/webhook/chat")
        .match_body(Matcher::Regex(
            r#""sessionId":"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}""#
                .to_string(),
        ))
        .with_status(200)
        .with_body("* point")
        .create_async()
        .await;

    let mut config = config_for(&server.url());
    config.spec.providers.webhook.session.policy = SessionPolicy::PerRequest;

    let (status, body) = post(router(&config), "/api/text", json!({"message": "tides"})).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "* point");
}

#[tokio::test]
async fn test_text_error_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/webhook/chat")
        .with_status(404)
        .with_body("")
        .create_async()
        .await;

    let (status, body) = post(
        router(&config_for(&server.url())),
        "/api/text",
        json!({"message": "tides"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Error: HTTP 404");
}

#[tokio::test]
async fn test_unreachable_upstream_is_in_band() {
    let mut config = RelayConfigManifest::default();
    config.spec.providers.webhook.url = "http://127.0.0.1:1/webhook".to_string();

    let (status, body) = post(router(&config), "/api/text", json!({"message": "x"})).await;

    assert_eq!(status, StatusCode::OK);
    let text = body["response"].as_str().unwrap();
    assert!(text.starts_with("Error: "), "got {}", text);
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let config = RelayConfigManifest::default();
    let request = Request::builder()
        .method("GET")
        .uri("/api/chat1")
        .body(Body::empty())
        .unwrap();

    let response = router(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_lists_ready_routes() {
    let server = Server::new_async().await;
    let mut config = config_for(&server.url());
    config.spec.providers.webhook.enabled = false;

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(
        body["routes"],
        json!(["/api/chat1", "/api/chat2", "/api/chat3", "/api/image"])
    );
}
