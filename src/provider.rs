//! Closed set of supported providers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default bound for hosted SaaS backends
pub(crate) const HOSTED_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound for the self-hosted backend
pub(crate) const LOCAL_TIMEOUT: Duration = Duration::from_secs(120);

/// Provider identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// OpenAI chat completions API
    OpenAI,
    /// Anthropic messages API
    Anthropic,
    /// Google Gemini generateContent API
    Gemini,
    /// Self-hosted Ollama-style completion endpoint
    Local,
}

impl ProviderId {
    /// Every provider, in the order they are reported to callers
    pub const ALL: [ProviderId; 4] = [
        ProviderId::OpenAI,
        ProviderId::Anthropic,
        ProviderId::Gemini,
        ProviderId::Local,
    ];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Gemini => "gemini",
            ProviderId::Local => "local",
        }
    }

    /// Human-readable name used in error details
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "OpenAI",
            ProviderId::Anthropic => "Anthropic",
            ProviderId::Gemini => "Gemini",
            ProviderId::Local => "Local",
        }
    }

    /// Historical labels still accepted on input
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ProviderId::Local => &["deepseek", "ollama"],
            _ => &[],
        }
    }

    /// Whether this backend is hosted (as opposed to self-hosted)
    pub fn is_hosted(&self) -> bool {
        !matches!(self, ProviderId::Local)
    }

    /// Default request bound for this backend
    pub fn default_timeout(&self) -> Duration {
        if self.is_hosted() {
            HOSTED_TIMEOUT
        } else {
            LOCAL_TIMEOUT
        }
    }

    /// Get the default API base URL for this provider
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "https://api.openai.com/v1",
            ProviderId::Anthropic => "https://api.anthropic.com",
            ProviderId::Gemini => "https://generativelanguage.googleapis.com",
            ProviderId::Local => "http://localhost:11434",
        }
    }

    /// Comma-separated list of accepted identifiers
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted || p.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| crate::Error::InvalidProvider {
                given: s.to_string(),
            })
    }
}
