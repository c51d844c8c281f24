//! Provider dispatch gateway: one request, one backend, one normalized answer
mod adapter;
mod credentials;
mod dispatch;
mod message;
mod provider;
mod registry;

#[cfg(feature = "gate")]
pub mod gate;

use std::time::Duration;

use thiserror::Error;

/// Result type for llm-gate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for llm-gate operations
///
/// Every variant maps onto exactly one [`Classification`], which is what the
/// transport layer turns into a status code.
#[derive(Debug, Error)]
pub enum Error {
    /// Provider identifier outside the closed set
    #[error("Invalid provider '{}'. Supported providers: {}", .given, ProviderId::supported_list())]
    InvalidProvider { given: String },

    /// Request failed shape validation (empty input or model)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Provider is known but has no adapter registered
    #[error("Provider '{given}' is not supported. Supported providers: {supported}")]
    NotSupported { given: String, supported: String },

    /// Outbound call exceeded its bound
    #[error("{} API request timed out after {}s", .provider, .after.as_secs_f64())]
    Timeout {
        provider: ProviderId,
        after: Duration,
    },

    /// Network failure before any backend response
    #[error("{provider} API request failed: {message}")]
    Transport {
        provider: ProviderId,
        message: String,
    },

    /// Backend answered with a non-success status
    #[error("{provider} API error ({status}): {body}")]
    BackendRejected {
        provider: ProviderId,
        status: u16,
        body: String,
    },

    /// Backend reported the requested model as unknown
    #[error("{provider} model '{model}' not found: {body}")]
    NotFound {
        provider: ProviderId,
        model: String,
        body: String,
    },

    /// Anything else
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// The caller-facing classification of this error
    pub fn classification(&self) -> Classification {
        match self {
            Error::InvalidProvider { .. } => Classification::InvalidProvider,
            Error::InvalidRequest(_) => Classification::InvalidRequest,
            Error::NotSupported { .. } => Classification::NotSupported,
            Error::Timeout { .. } => Classification::Timeout,
            Error::Transport { .. } => Classification::TransportFailure,
            Error::BackendRejected { .. } => Classification::BackendRejected,
            Error::NotFound { .. } => Classification::NotFound,
            Error::Unexpected(_) => Classification::Unexpected,
        }
    }

    /// Conventional HTTP status for this error.
    ///
    /// Backend rejections reuse the backend's own status when it is an error
    /// status, and fall back to 500 otherwise.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::BackendRejected { status, .. } if (400..=599).contains(status) => *status,
            _ => self.classification().status_code(),
        }
    }
}

/// Tagged category of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Classification {
    InvalidProvider,
    InvalidRequest,
    NotSupported,
    Timeout,
    TransportFailure,
    BackendRejected,
    NotFound,
    Unexpected,
}

impl Classification {
    /// Default HTTP status for the classification
    pub fn status_code(&self) -> u16 {
        match self {
            Classification::InvalidProvider
            | Classification::InvalidRequest
            | Classification::NotSupported => 400,
            Classification::Timeout => 504,
            Classification::TransportFailure => 502,
            Classification::NotFound => 404,
            Classification::BackendRejected | Classification::Unexpected => 500,
        }
    }

    /// Stable name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::InvalidProvider => "InvalidProvider",
            Classification::InvalidRequest => "InvalidRequest",
            Classification::NotSupported => "NotSupported",
            Classification::Timeout => "Timeout",
            Classification::TransportFailure => "TransportFailure",
            Classification::BackendRejected => "BackendRejected",
            Classification::NotFound => "NotFound",
            Classification::Unexpected => "Unexpected",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub use adapter::{
    Adapter, AdapterOptions, AnthropicAdapter, GeminiAdapter, LocalAdapter, OpenAIAdapter,
};
pub use credentials::{CredentialResolver, CredentialSource, EnvSource, StaticSource};
pub use dispatch::Dispatcher;
pub use message::{GenerationRequest, GenerationResponse, Message, MessageRole};
pub use provider::ProviderId;
pub use registry::Registry;
