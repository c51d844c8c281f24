//! Local (Ollama-style) completion adapter

use super::{build_http_client, parse_body, send, Adapter, AdapterOptions};
use crate::{CredentialResolver, ProviderId, Result};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Adapter for a self-hosted inference server
pub struct LocalAdapter {
    credentials: CredentialResolver,
    options: AdapterOptions,
    http_client: HttpClient,
}

impl LocalAdapter {
    /// Create a new local adapter
    pub fn new(credentials: CredentialResolver, options: AdapterOptions) -> Result<Self> {
        Ok(LocalAdapter {
            http_client: build_http_client(options.timeout)?,
            credentials,
            options,
        })
    }
}

#[async_trait::async_trait]
impl Adapter for LocalAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Local
    }

    fn timeout(&self) -> Duration {
        self.options.timeout
    }

    async fn generate(&self, input: &str, model: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.credentials.base_url(ProviderId::Local));

        // stream=false: one complete JSON object instead of NDJSON chunks
        let request = GenerateRequest {
            model,
            prompt: input,
            stream: false,
        };

        let builder = self.http_client.post(&url).json(&request);
        let body = send(ProviderId::Local, model, self.options.timeout, builder).await?;
        let response: GenerateResponse = parse_body(ProviderId::Local, &body)?;

        Ok(response.response)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}
