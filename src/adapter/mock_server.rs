//! Mock backends for testing adapters offline
//!
//! One wiremock server answers for every provider; the resolver returned by
//! [`BackendMockServer::resolver`] points all base URLs at it.

use crate::{CredentialResolver, StaticSource};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub(crate) const TEST_KEY: &str = "test-key";

pub(crate) struct BackendMockServer {
    server: MockServer,
}

impl BackendMockServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Resolver with every base URL pointed at this server and test keys set
    pub fn resolver(&self) -> CredentialResolver {
        let base = self.base_url();
        CredentialResolver::new(
            StaticSource::new()
                .with("OPENAI_API_KEY", TEST_KEY)
                .with("ANTHROPIC_API_KEY", TEST_KEY)
                .with("GOOGLE_API_KEY", TEST_KEY)
                .with("OPENAI_API_BASE", base.clone())
                .with("ANTHROPIC_BASE_URL", base.clone())
                .with("GEMINI_API_BASE", base.clone())
                .with("OLLAMA_API_URL", base),
        )
    }

    /// Resolver pointed at this server but without any API keys
    pub fn resolver_without_keys(&self) -> CredentialResolver {
        let base = self.base_url();
        CredentialResolver::new(
            StaticSource::new()
                .with("OPENAI_API_BASE", base.clone())
                .with("ANTHROPIC_BASE_URL", base.clone())
                .with("GEMINI_API_BASE", base.clone())
                .with("OLLAMA_API_URL", base),
        )
    }

    /// Setup a non-streaming chat completion response
    pub async fn mock_chat_completion(&self, content: &str) {
        self.mock_json(
            "/chat/completions",
            200,
            serde_json::json!({
                "id": "chatcmpl-mock",
                "object": "chat.completion",
                "created": 1234567890,
                "model": "gpt-4",
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": content
                    },
                    "finish_reason": "stop"
                }],
                "usage": {
                    "prompt_tokens": 10,
                    "completion_tokens": 5,
                    "total_tokens": 15
                }
            }),
        )
        .await;
    }

    /// Setup an Anthropic message response
    pub async fn mock_message(&self, content: &str) {
        self.mock_json(
            "/v1/messages",
            200,
            serde_json::json!({
                "id": "msg-mock",
                "type": "message",
                "role": "assistant",
                "content": [{
                    "type": "text",
                    "text": content
                }],
                "stop_reason": "end_turn",
                "model": "claude-3-sonnet-20240229",
                "usage": {
                    "input_tokens": 10,
                    "output_tokens": 5
                }
            }),
        )
        .await;
    }

    /// Setup a Gemini generateContent response
    pub async fn mock_generate_content(&self, model: &str, parts: &[&str]) {
        let parts: Vec<_> = parts
            .iter()
            .map(|text| serde_json::json!({ "text": text }))
            .collect();
        self.mock_json(
            &format!("/v1beta/models/{}:generateContent", model),
            200,
            serde_json::json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": parts
                    },
                    "finishReason": "STOP",
                    "index": 0
                }]
            }),
        )
        .await;
    }

    /// Setup a local (Ollama-style) generate response
    pub async fn mock_local_generate(&self, response: &str) {
        self.mock_json(
            "/api/generate",
            200,
            serde_json::json!({
                "model": "deepseek-r1:1.5b",
                "created_at": "2024-01-01T00:00:00Z",
                "response": response,
                "done": true
            }),
        )
        .await;
    }

    pub async fn mock_json(&self, route: &str, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_text(&self, route: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Respond only after `delay`, for exercising timeouts
    pub async fn mock_delayed(&self, route: &str, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }
}

/// Base URL on which nothing is listening
pub(crate) fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
