//! Provider registry: `ProviderId` to adapter

use crate::adapter::{AnthropicAdapter, GeminiAdapter, LocalAdapter, OpenAIAdapter};
use crate::{Adapter, AdapterOptions, CredentialResolver, Error, ProviderId, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Static mapping from provider to adapter instance.
///
/// Resolution is a map lookup; it never performs I/O.
#[derive(Clone, Default)]
pub struct Registry {
    adapters: HashMap<ProviderId, Arc<dyn Adapter>>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock adapter for every provider.
    ///
    /// Adding a provider only requires a new match arm here.
    pub fn standard<F>(credentials: CredentialResolver, options: F) -> Result<Self>
    where
        F: Fn(ProviderId) -> AdapterOptions,
    {
        let mut registry = Self::new();
        for provider in ProviderId::ALL {
            let opts = options(provider);
            let creds = credentials.clone();
            let adapter: Arc<dyn Adapter> = match provider {
                ProviderId::OpenAI => Arc::new(OpenAIAdapter::new(creds, opts)?),
                ProviderId::Anthropic => Arc::new(AnthropicAdapter::new(creds, opts)?),
                ProviderId::Gemini => Arc::new(GeminiAdapter::new(creds, opts)?),
                ProviderId::Local => Arc::new(LocalAdapter::new(creds, opts)?),
            };
            registry.register_shared(adapter);
        }
        Ok(registry)
    }

    /// Register an adapter under its own provider, replacing any previous one
    pub fn register<A>(&mut self, adapter: A)
    where
        A: Adapter + 'static,
    {
        self.register_shared(Arc::new(adapter));
    }

    pub fn register_shared(&mut self, adapter: Arc<dyn Adapter>) {
        self.adapters.insert(adapter.provider(), adapter);
    }

    /// Look up the adapter for a provider
    pub fn resolve(&self, provider: ProviderId) -> Result<Arc<dyn Adapter>> {
        self.adapters
            .get(&provider)
            .cloned()
            .ok_or_else(|| Error::NotSupported {
                given: provider.as_str().to_string(),
                supported: self.supported_list(),
            })
    }

    /// Registered providers, in canonical order
    pub fn providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|p| self.adapters.contains_key(p))
            .collect()
    }

    fn supported_list(&self) -> String {
        self.providers()
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
