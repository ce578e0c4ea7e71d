// ABOUTME: Tests for the Qwen and Gemini chat backends and the running analyzer
// ABOUTME: Mocks both wire formats and drives the analyzer through a fake provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::{coros_config, envelope_ok, split_node, ManualClock, ScriptedTransport};
use fitgo::analyzer::RunningAnalyzer;
use fitgo::config::{ChatProviderType, LlmConfig};
use fitgo::coros::{ActivityAggregator, SessionCache};
use fitgo::errors::{AppError, ErrorCode};
use fitgo::llm::{
    ChatMessage, ChatProvider, ChatReply, GeminiConfig, GeminiProvider, LlmProvider, MessageRole,
    OpenAiCompatibleConfig, OpenAiCompatibleProvider,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn llm_config(provider: &str, api_key: Option<&str>) -> LlmConfig {
    LlmConfig {
        provider: provider.to_owned(),
        base_url: None,
        api_key: api_key.map(str::to_owned),
        model: None,
        timeout_secs: 5,
    }
}

// ============================================================================
// Provider selection
// ============================================================================

#[test]
fn test_provider_type_parse() {
    assert_eq!(ChatProviderType::parse("qwen"), Some(ChatProviderType::Qwen));
    assert_eq!(ChatProviderType::parse(" Gemini "), Some(ChatProviderType::Gemini));
    assert_eq!(ChatProviderType::parse("openai"), None);
    assert_eq!(ChatProviderType::default(), ChatProviderType::Qwen);
}

#[test]
fn test_unknown_provider_is_config_invalid() {
    let err = ChatProvider::from_config(&llm_config("claude", Some("k"))).unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);
}

#[test]
fn test_missing_api_key_is_config_missing() {
    let err = ChatProvider::from_config(&llm_config("gemini", None)).unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);
}

#[test]
fn test_from_config_applies_model_override() {
    let mut config = llm_config("qwen", Some("k"));
    config.model = Some("qwen-max".to_owned());

    let provider = ChatProvider::from_config(&config).unwrap();

    assert_eq!(provider.name(), "qwen");
    assert_eq!(provider.default_model(), "qwen-max");
}

// ============================================================================
// Qwen (OpenAI-compatible)
// ============================================================================

fn qwen_for(server: &MockServer) -> OpenAiCompatibleProvider {
    OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::qwen("qwen-key").with_base_url(server.uri()))
        .unwrap()
}

#[tokio::test]
async fn test_qwen_posts_chat_completion_with_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer qwen-key"))
        .and(body_partial_json(json!({
            "model": "qwen-plus",
            "messages": [{ "role": "user", "content": "hello" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "qwen-plus",
            "choices": [{
                "message": { "role": "assistant", "content": "## Report" },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = qwen_for(&server)
        .complete(&[ChatMessage::user("hello")])
        .await
        .unwrap();

    assert_eq!(response.text, "## Report");
    assert_eq!(response.model, "qwen-plus");
}

#[tokio::test]
async fn test_qwen_empty_choices_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = qwen_for(&server)
        .complete(&[ChatMessage::user("hello")])
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_qwen_error_statuses_map_to_codes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let err = qwen_for(&server)
        .complete(&[ChatMessage::user("hello")])
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
    assert!(err.message.contains("Incorrect API key"));
}

#[tokio::test]
async fn test_qwen_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "slow down" }
        })))
        .mount(&server)
        .await;

    let err = qwen_for(&server)
        .complete(&[ChatMessage::user("hello")])
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalRateLimited);
}

#[tokio::test]
async fn test_chat_provider_delegates_to_configured_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "pong" }, "finish_reason": "stop" }]
        })))
        .mount(&server)
        .await;

    let mut config = llm_config("qwen", Some("k"));
    config.base_url = Some(server.uri());
    let provider = ChatProvider::from_config(&config).unwrap();

    let reply = provider.complete(&[ChatMessage::user("ping")]).await.unwrap();

    assert_eq!(reply.text, "pong");
    assert_eq!(reply.model, "qwen-plus");
}

// ============================================================================
// Gemini
// ============================================================================

#[tokio::test]
async fn test_gemini_sends_system_instruction_and_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "gem-key"))
        .and(body_partial_json(json!({
            "system_instruction": { "parts": [{ "text": "be brief" }] },
            "contents": [
                { "role": "user", "parts": [{ "text": "hi" }] },
                { "role": "model", "parts": [{ "text": "hello" }] },
                { "role": "user", "parts": [{ "text": "analyze" }] }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Solid run." }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        GeminiProvider::new(GeminiConfig::new("gem-key").with_base_url(server.uri())).unwrap();
    let messages = [
        ChatMessage::system("be brief"),
        ChatMessage::user("hi"),
        ChatMessage::assistant("hello"),
        ChatMessage::user("analyze"),
    ];

    let response = provider.complete(&messages).await.unwrap();

    assert_eq!(response.text, "Solid run.");
    assert_eq!(response.model, "gemini-2.5-flash");

    let received = server.received_requests().await.unwrap();
    assert!(received[0].url.query().is_none());
}

#[tokio::test]
async fn test_gemini_transport_error_never_exposes_api_key() {
    let provider = GeminiProvider::new(
        GeminiConfig::new("SECRETKEY123").with_base_url("http://127.0.0.1:1"),
    )
    .unwrap();

    let err = provider
        .complete(&[ChatMessage::user("hi")])
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    assert!(err.source.is_some());
    assert!(!err.message.contains("SECRETKEY123"));
    assert!(!err.chain().contains("SECRETKEY123"));
}

#[tokio::test]
async fn test_gemini_without_candidates_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let provider =
        GeminiProvider::new(GeminiConfig::new("gem-key").with_base_url(server.uri())).unwrap();

    let err = provider
        .complete(&[ChatMessage::user("hi")])
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_gemini_forbidden_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let provider =
        GeminiProvider::new(GeminiConfig::new("bad").with_base_url(server.uri())).unwrap();

    let err = provider
        .complete(&[ChatMessage::user("hi")])
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
    assert!(err.message.contains("API key not valid"));
}

// ============================================================================
// Running analyzer
// ============================================================================

/// Provider that records requests and replies with a fixed text
struct RecordingProvider {
    reply: Result<String, ErrorCode>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl RecordingProvider {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_owned()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing(code: ErrorCode) -> Self {
        Self {
            reply: Err(code),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmProvider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn display_name(&self) -> &'static str {
        "Recording"
    }

    fn default_model(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatReply, AppError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        match &self.reply {
            Ok(text) => Ok(ChatReply {
                text: text.clone(),
                model: "test-model".to_owned(),
            }),
            Err(code) => Err(AppError::new(*code, "provider failed")),
        }
    }
}

fn analyzer_with(provider: Arc<RecordingProvider>) -> RunningAnalyzer {
    let detail = envelope_ok(&json!({
        "lapList": [split_node(2, 0)],
        "summary": { "distance": 200_000, "totalTime": 72_000 }
    }));
    let transport = Arc::new(ScriptedTransport::with_detail(detail));
    let session = Arc::new(SessionCache::new(
        transport.clone(),
        Arc::new(ManualClock::starting_2025()),
        coros_config(),
    ));
    let aggregator = Arc::new(ActivityAggregator::new(transport, session));
    RunningAnalyzer::new(aggregator, provider)
}

#[tokio::test]
async fn test_analyzer_sends_single_user_prompt_with_data() {
    let provider = Arc::new(RecordingProvider::replying("# Running report"));
    let analyzer = analyzer_with(provider.clone());

    let report = analyzer.analyze("label-1", "100").await.unwrap();

    assert_eq!(report, "# Running report");
    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].len(), 1);
    let message = &seen[0][0];
    assert_eq!(message.role, MessageRole::User);
    assert!(message.content.contains(r#""lapType":2"#));
    assert!(message.content.contains(r#""totalTime":72000"#));
    assert!(!message.content.contains("{lap_list}"));
    assert!(!message.content.contains("{summary}"));
}

#[tokio::test]
async fn test_analyzer_propagates_provider_error() {
    let provider = Arc::new(RecordingProvider::failing(ErrorCode::ExternalRateLimited));
    let analyzer = analyzer_with(provider);

    let err = analyzer.analyze("label-1", "100").await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalRateLimited);
}
