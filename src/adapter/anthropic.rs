//! Anthropic messages adapter

use super::{build_http_client, parse_body, send, warn_missing_key, Adapter, AdapterOptions};
use crate::{CredentialResolver, Error, Message, ProviderId, Result};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic adapter
pub struct AnthropicAdapter {
    credentials: CredentialResolver,
    options: AdapterOptions,
    http_client: HttpClient,
}

impl AnthropicAdapter {
    /// Create a new Anthropic adapter
    pub fn new(credentials: CredentialResolver, options: AdapterOptions) -> Result<Self> {
        Ok(AnthropicAdapter {
            http_client: build_http_client(options.timeout)?,
            credentials,
            options,
        })
    }
}

#[async_trait::async_trait]
impl Adapter for AnthropicAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn timeout(&self) -> Duration {
        self.options.timeout
    }

    async fn generate(&self, input: &str, model: &str) -> Result<String> {
        let url = format!("{}/v1/messages", self.credentials.base_url(ProviderId::Anthropic));

        let request = MessageRequest {
            model,
            max_tokens: self.options.max_tokens,
            messages: vec![Message::user(input)],
        };

        let mut builder = self
            .http_client
            .post(&url)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request);
        match self.credentials.api_key(ProviderId::Anthropic) {
            Some(key) => builder = builder.header("x-api-key", key),
            None => warn_missing_key(ProviderId::Anthropic),
        }

        let body = send(ProviderId::Anthropic, model, self.options.timeout, builder).await?;
        let response: MessageResponse = parse_body(ProviderId::Anthropic, &body)?;

        response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| {
                Error::Unexpected("Anthropic response contained no text content block".to_string())
            })
    }
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}
