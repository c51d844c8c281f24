//! OpenAI chat completions adapter

use super::{build_http_client, parse_body, send, warn_missing_key, Adapter, AdapterOptions};
use crate::{CredentialResolver, Error, Message, ProviderId, Result};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI adapter
pub struct OpenAIAdapter {
    credentials: CredentialResolver,
    options: AdapterOptions,
    http_client: HttpClient,
}

impl OpenAIAdapter {
    /// Create a new OpenAI adapter
    pub fn new(credentials: CredentialResolver, options: AdapterOptions) -> Result<Self> {
        Ok(OpenAIAdapter {
            http_client: build_http_client(options.timeout)?,
            credentials,
            options,
        })
    }
}

#[async_trait::async_trait]
impl Adapter for OpenAIAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::OpenAI
    }

    fn timeout(&self) -> Duration {
        self.options.timeout
    }

    async fn generate(&self, input: &str, model: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.credentials.base_url(ProviderId::OpenAI));

        let request = ChatRequest {
            model,
            messages: vec![Message::user(input)],
            stream: false,
        };

        let mut builder = self.http_client.post(&url).json(&request);
        match self.credentials.api_key(ProviderId::OpenAI) {
            Some(key) => builder = builder.bearer_auth(key),
            None => warn_missing_key(ProviderId::OpenAI),
        }

        let body = send(ProviderId::OpenAI, model, self.options.timeout, builder).await?;
        let response: ChatResponse = parse_body(ProviderId::OpenAI, &body)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::Unexpected("No content in OpenAI response".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}
