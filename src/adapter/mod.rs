//! Backend adapters
//!
//! One adapter per [`ProviderId`]. Each owns a long-lived HTTP client and
//! resolves its credential on every call, so nothing is shared between
//! requests besides the connection pool.

mod anthropic;
mod gemini;
mod local;
mod openai;

#[cfg(test)]
pub(crate) mod mock_server;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use local::LocalAdapter;
pub use openai::OpenAIAdapter;

use crate::{Error, ProviderId, Result};
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Default completion budget for backends that require one
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Capability shared by every backend: text in, text out
#[async_trait::async_trait]
pub trait Adapter: Send + Sync {
    /// Provider this adapter serves
    fn provider(&self) -> ProviderId;

    /// Bound applied to a single call
    fn timeout(&self) -> Duration;

    /// Issue exactly one outbound call and extract its output text
    async fn generate(&self, input: &str, model: &str) -> Result<String>;
}

/// Construction options for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterOptions {
    /// Request timeout
    pub timeout: Duration,

    /// Maximum tokens for response (Anthropic requires this)
    pub max_tokens: u32,
}

impl AdapterOptions {
    /// Defaults for the given provider (30s hosted, 120s local)
    pub fn for_provider(provider: ProviderId) -> Self {
        Self {
            timeout: provider.default_timeout(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Build an HTTP client with specified timeout
fn build_http_client(timeout: Duration) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .build()
        .map_err(|e| Error::Unexpected(format!("Failed to build HTTP client: {}", e)))
}

/// Map a client-side failure onto the adapter error classes
fn classify_send_error(provider: ProviderId, timeout: Duration, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout {
            provider,
            after: timeout,
        }
    } else if e.is_connect() || e.is_request() {
        Error::Transport {
            provider,
            message: e.to_string(),
        }
    } else {
        Error::Unexpected(format!("{} API error: {}", provider, e))
    }
}

/// Send one request and return the body of a successful response.
///
/// Non-success statuses become `NotFound` (404) or `BackendRejected`, both
/// carrying the raw body.
async fn send(
    provider: ProviderId,
    model: &str,
    timeout: Duration,
    request: RequestBuilder,
) -> Result<String> {
    let response = request
        .send()
        .await
        .map_err(|e| classify_send_error(provider, timeout, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| classify_send_error(provider, timeout, e))?;

    if status == StatusCode::NOT_FOUND {
        warn!("{} reported model '{}' as not found", provider, model);
        return Err(Error::NotFound {
            provider,
            model: model.to_string(),
            body,
        });
    }

    if !status.is_success() {
        warn!("{} API rejected request with status {}", provider, status);
        return Err(Error::BackendRejected {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    debug!("{} API responded with {} bytes", provider, body.len());
    Ok(body)
}

/// Decode a success body into the backend's response shape
fn parse_body<T: DeserializeOwned>(provider: ProviderId, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        Error::Unexpected(format!(
            "Failed to parse {} response: {}. Body: {}",
            provider, e, body
        ))
    })
}

/// Log once per call when a hosted backend has no credential configured
fn warn_missing_key(provider: ProviderId) {
    warn!(
        "No API key configured for {} ({}); sending request without credentials",
        provider,
        crate::CredentialResolver::api_key_names(provider).join(" or ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let hosted = AdapterOptions::for_provider(ProviderId::Anthropic);
        assert_eq!(hosted.timeout, Duration::from_secs(30));
        assert_eq!(hosted.max_tokens, 1024);

        let local = AdapterOptions::for_provider(ProviderId::Local)
            .with_timeout(Duration::from_secs(300))
            .with_max_tokens(64);
        assert_eq!(local.timeout, Duration::from_secs(300));
        assert_eq!(local.max_tokens, 64);
    }

    #[test]
    fn test_parse_body_failure_is_unexpected() {
        let err = parse_body::<serde_json::Value>(ProviderId::Local, "not json").unwrap_err();
        assert_eq!(err.classification(), crate::Classification::Unexpected);
        assert!(err.to_string().contains("not json"));
    }
}
