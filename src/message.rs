//! Request, response and chat message types

use crate::{Error, ProviderId, Result};
use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User message
    User,
}

/// A chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// A validated generation request.
///
/// Only constructible through [`GenerationRequest::new`], so holding one
/// means the provider decoded and both text fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    input: String,
    provider: ProviderId,
    model: String,
}

impl GenerationRequest {
    /// Validate raw caller fields.
    ///
    /// The provider is checked first, so an unknown provider is reported as
    /// such regardless of the other fields.
    pub fn new(
        input: impl Into<String>,
        provider: &str,
        model: impl Into<String>,
    ) -> Result<Self> {
        let provider: ProviderId = provider.parse()?;
        let input = input.into();
        let model = model.into();

        if input.trim().is_empty() {
            return Err(Error::InvalidRequest("input must not be empty".to_string()));
        }
        if model.trim().is_empty() {
            return Err(Error::InvalidRequest("model must not be empty".to_string()));
        }

        Ok(Self {
            input,
            provider,
            model,
        })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Normalized generation output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub output: String,
}
