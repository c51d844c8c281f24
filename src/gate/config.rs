//! Gateway configuration
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8000
//! hosted_timeout_secs = 30
//! local_timeout_secs = 120
//! anthropic_max_tokens = 1024
//! ```

use crate::{AdapterOptions, ProviderId};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host address to listen on
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bound for hosted backends in seconds (default: 30)
    #[serde(default = "default_hosted_timeout")]
    pub hosted_timeout_secs: u64,

    /// Bound for the local backend in seconds (default: 120)
    #[serde(default = "default_local_timeout")]
    pub local_timeout_secs: u64,

    /// Completion budget sent to Anthropic (default: 1024)
    #[serde(default = "default_max_tokens")]
    pub anthropic_max_tokens: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            hosted_timeout_secs: default_hosted_timeout(),
            local_timeout_secs: default_local_timeout(),
            anthropic_max_tokens: default_max_tokens(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_hosted_timeout() -> u64 {
    ProviderId::OpenAI.default_timeout().as_secs()
}

fn default_local_timeout() -> u64 {
    ProviderId::Local.default_timeout().as_secs()
}

fn default_max_tokens() -> u32 {
    crate::adapter::DEFAULT_MAX_TOKENS
}

impl GatewayConfig {
    /// Load gateway configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.port == 0 {
            anyhow::bail!("Invalid port: 0");
        }
        for (name, secs) in [
            ("hosted_timeout_secs", self.hosted_timeout_secs),
            ("local_timeout_secs", self.local_timeout_secs),
        ] {
            if !(1..=600).contains(&secs) {
                anyhow::bail!("Invalid {}: {} (must be between 1 and 600 seconds)", name, secs);
            }
        }
        if self.anthropic_max_tokens == 0 {
            anyhow::bail!("Invalid anthropic_max_tokens: must be greater than 0");
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid address {}:{}", self.host, self.port))
    }

    /// Adapter options for a provider under this configuration
    pub fn adapter_options(&self, provider: ProviderId) -> AdapterOptions {
        let secs = if provider.is_hosted() {
            self.hosted_timeout_secs
        } else {
            self.local_timeout_secs
        };
        AdapterOptions::for_provider(provider)
            .with_timeout(Duration::from_secs(secs))
            .with_max_tokens(self.anthropic_max_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.hosted_timeout_secs, 30);
        assert_eq!(config.local_timeout_secs, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = GatewayConfig::from_toml("port = 9000\nlocal_timeout_secs = 300\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.local_timeout_secs, 300);
        assert_eq!(config.hosted_timeout_secs, 30);
    }

    #[test]
    fn test_adapter_options_split_hosted_and_local() {
        let config = GatewayConfig {
            hosted_timeout_secs: 10,
            local_timeout_secs: 200,
            ..GatewayConfig::default()
        };
        assert_eq!(
            config.adapter_options(ProviderId::Anthropic).timeout,
            Duration::from_secs(10)
        );
        assert_eq!(
            config.adapter_options(ProviderId::Local).timeout,
            Duration::from_secs(200)
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = GatewayConfig {
            local_timeout_secs: 0,
            ..GatewayConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GatewayConfig {
            host: "not a host".to_string(),
            ..GatewayConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
