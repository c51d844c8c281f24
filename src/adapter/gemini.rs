//! Gemini generateContent adapter

use super::{build_http_client, parse_body, send, warn_missing_key, Adapter, AdapterOptions};
use crate::{CredentialResolver, Error, ProviderId, Result};
use reqwest::{Client as HttpClient, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini adapter
pub struct GeminiAdapter {
    credentials: CredentialResolver,
    options: AdapterOptions,
    http_client: HttpClient,
}

impl GeminiAdapter {
    /// Create a new Gemini adapter
    pub fn new(credentials: CredentialResolver, options: AdapterOptions) -> Result<Self> {
        Ok(GeminiAdapter {
            http_client: build_http_client(options.timeout)?,
            credentials,
            options,
        })
    }
}

#[async_trait::async_trait]
impl Adapter for GeminiAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn timeout(&self) -> Duration {
        self.options.timeout
    }

    async fn generate(&self, input: &str, model: &str) -> Result<String> {
        // Callers sometimes pass the fully qualified "models/gemini-pro"
        let model_path = model.strip_prefix("models/").unwrap_or(model);
        let url = generate_content_url(&self.credentials.base_url(ProviderId::Gemini), model_path)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(input.to_string()),
                }],
            }],
        };

        let mut builder = self.http_client.post(url).json(&request);
        match self.credentials.api_key(ProviderId::Gemini) {
            Some(key) => builder = builder.header("x-goog-api-key", key),
            None => warn_missing_key(ProviderId::Gemini),
        }

        let body = send(ProviderId::Gemini, model, self.options.timeout, builder).await?;
        let response: GenerateContentResponse = parse_body(ProviderId::Gemini, &body)?;

        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(Error::Unexpected(format!("Gemini returned no output: {}", reason)));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Unexpected(format!(
                "Gemini candidate contained no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}

/// `{base}/v1beta/models/{model}:generateContent`, with the model encoded as
/// a single path segment
fn generate_content_url(base: &str, model: &str) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| Error::Unexpected(format!("Invalid Gemini base URL '{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| Error::Unexpected(format!("Invalid Gemini base URL '{}'", base)))?
        .pop_if_empty()
        .extend(["v1beta", "models"])
        .push(&format!("{}:generateContent", model));
    Ok(url)
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::mock_server::{BackendMockServer, TEST_KEY};
    use crate::Classification;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn adapter(credentials: CredentialResolver) -> GeminiAdapter {
        GeminiAdapter::new(credentials, AdapterOptions::for_provider(ProviderId::Gemini)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_concatenates_parts() {
        let mock = BackendMockServer::start().await;
        mock.mock_generate_content("gemini-pro", &["Mocked ", "Gemini response"])
            .await;

        let output = adapter(mock.resolver())
            .generate("Say 'Hello, Test!'", "gemini-pro")
            .await
            .unwrap();
        assert_eq!(output, "Mocked Gemini response");
    }

    #[tokio::test]
    async fn test_qualified_model_name_and_key_header() {
        let mock = BackendMockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-pro:generateContent"))
            .and(header("x-goog-api-key", TEST_KEY))
            .and(body_json(serde_json::json!({
                "contents": [{"parts": [{"text": "hi"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "hello"}]}}]
            })))
            .expect(1)
            .mount(mock.server())
            .await;

        let output = adapter(mock.resolver())
            .generate("hi", "models/gemini-pro")
            .await
            .unwrap();
        assert_eq!(output, "hello");
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_unexpected() {
        let mock = BackendMockServer::start().await;
        mock.mock_json(
            "/v1beta/models/gemini-pro:generateContent",
            200,
            serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}}),
        )
        .await;

        let err = adapter(mock.resolver()).generate("hi", "gemini-pro").await.unwrap_err();
        assert_eq!(err.classification(), Classification::Unexpected);
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_model_stays_inside_its_path_segment() {
        let url = generate_content_url("https://example.test/proxy", "gemini-pro?alt=sse").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/proxy/v1beta/models/gemini-pro%3Falt=sse:generateContent"
        );
        assert_eq!(url.query(), None);

        let url = generate_content_url("https://example.test", "x/../../v1/files").unwrap();
        assert_eq!(
            url.path(),
            "/v1beta/models/x%2F..%2F..%2Fv1%2Ffiles:generateContent"
        );
    }

    #[tokio::test]
    async fn test_query_in_model_is_not_forwarded() {
        let mock = BackendMockServer::start().await;
        mock.mock_generate_content("gemini-pro%3Falt=sse", &["ok"]).await;

        let output = adapter(mock.resolver())
            .generate("hi", "gemini-pro?alt=sse")
            .await
            .unwrap();
        assert_eq!(output, "ok");
    }

    #[tokio::test]
    async fn test_unknown_model_is_not_found() {
        let mock = BackendMockServer::start().await;
        mock.mock_text(
            "/v1beta/models/gemini-ultra-9:generateContent",
            404,
            "models/gemini-ultra-9 is not found",
        )
        .await;

        let err = adapter(mock.resolver())
            .generate("hi", "gemini-ultra-9")
            .await
            .unwrap_err();
        assert_eq!(err.classification(), Classification::NotFound);
        assert_eq!(err.status_code(), 404);
    }
}
