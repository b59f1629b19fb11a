//! HTTP-level tests for the Anthropic provider.

use pretty_assertions::assert_eq;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use course_rag::capability::CapabilitySchema;
use course_rag::config::RagConfig;
use course_rag::error::RagError;
use course_rag::models::AnthropicModel;
use course_rag::provider::anthropic::AnthropicProvider;
use course_rag::provider::{create_provider, CompletionRequest, ModelProvider};
use course_rag::types::*;

fn provider(server: &MockServer) -> AnthropicProvider {
    AnthropicProvider::new(
        AnthropicModel::ClaudeSonnet4,
        "test-key".to_string(),
        Some(server.uri()),
    )
}

fn request() -> CompletionRequest {
    CompletionRequest::new("sys", vec![ConversationTurn::user("What is in lesson 5?")]).with_tools(
        vec![CapabilitySchema::new(
            "search_course_content",
            "Search course materials",
            CapabilitySchema::object()
                .string("query", "What to search for", true)
                .build(),
        )],
    )
}

#[tokio::test]
async fn tool_use_response_becomes_invocation_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({
            "model": "claude-sonnet-4-20250514",
            "system": "sys",
            "tool_choice": {"type": "auto"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [{
                "type": "tool_use",
                "id": "toolu_123",
                "name": "search_course_content",
                "input": {"query": "lesson 5", "lesson_number": 5}
            }],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 12, "output_tokens": 7}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server).complete(&request()).await.unwrap();

    assert_eq!(response.stop_reason, StopReason::ToolInvocationRequested);
    assert_eq!(
        response.invocations()[0],
        &Invocation {
            id: "toolu_123".into(),
            name: "search_course_content".into(),
            arguments: serde_json::json!({"query": "lesson 5", "lesson_number": 5}),
        }
    );
    assert_eq!(response.text(), "");
    assert_eq!(response.usage.total_tokens, 19);
}

#[tokio::test]
async fn end_turn_response_is_natural_stop() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{"type": "text", "text": "Lesson 5 covers MCP clients."}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 3, "output_tokens": 4}
        })))
        .mount(&server)
        .await;

    let response = provider(&server).complete(&request()).await.unwrap();

    assert_eq!(response.stop_reason, StopReason::NaturalStop);
    assert_eq!(response.text(), "Lesson 5 covers MCP clients.");
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(&request()).await.unwrap_err();

    assert!(matches!(err, RagError::Authentication(ref m) if m == "invalid x-api-key"));
    assert!(err.is_provider_failure());
}

#[tokio::test]
async fn overloaded_maps_to_server_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(&request()).await.unwrap_err();

    assert!(matches!(err, RagError::Api { status: 529, .. }));
    assert!(err.is_provider_failure());
}

#[test]
fn create_provider_requires_api_key() {
    let err = match create_provider(&RagConfig::new()) {
        Ok(_) => panic!("expected missing key error"),
        Err(err) => err,
    };
    assert!(matches!(err, RagError::Authentication(_)));
    assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
}

#[test]
fn create_provider_uses_configured_model() {
    let config = RagConfig::new()
        .with_api_key("sk-ant-test")
        .with_model("claude-3-5-haiku-20241022");
    let provider = create_provider(&config).unwrap();
    assert_eq!(provider.provider_name(), "anthropic");
    assert_eq!(provider.model_id(), "claude-3-5-haiku-20241022");
}
