//! Provider adapter — the abstraction over LLM backends.
//!
//! An adapter knows how to send a flattened prompt to one LLM backend and
//! return the generated text. It is the single external boundary of the
//! core: everything on this side is synchronous request shaping, and the
//! one `await` in the system happens inside `complete()`.
//!
//! Implementations: OpenAI-compatible endpoints, native Anthropic, plus
//! scripted mocks in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ProviderError;

/// A fully shaped request, ready for one backend call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g. "gpt-4", "claude-3-sonnet").
    pub model: String,

    /// The flattened prompt text.
    pub prompt: String,

    /// Maximum tokens for the completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Optional free-form instructions, sent ahead of the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// The routing configuration the request was shaped under. Adapters
    /// may read backend-specific hints from it; they never write to it.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub routing: serde_json::Map<String, serde_json::Value>,
}

impl CompletionRequest {
    /// Create a request with just a model and prompt.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_tokens: None,
            instructions: None,
            routing: serde_json::Map::new(),
        }
    }
}

/// Token usage reported by a backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A complete response from a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text.
    pub content: String,

    /// Which model actually responded (may differ from requested).
    pub model: String,

    /// Token usage statistics, when the backend reports them.
    pub usage: Option<Usage>,
}

/// The provider adapter trait.
///
/// Every LLM backend implements this. The executor calls `complete()`
/// without knowing which backend is behind it. Failures propagate to the
/// caller uninterpreted — adapters perform no retries.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + std::fmt::Debug {
    /// A human-readable name for this adapter (e.g. "openai", "anthropic").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;
}

/// A registry of available adapters, keyed by provider name.
///
/// The executor uses this to resolve the provider named in a Context's
/// routing. Unknown names fall back to the default adapter, so a Context
/// routed to an unrecognized provider still executes somewhere sensible.
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
    default_name: String,
}

impl AdapterRegistry {
    /// Create a new registry with a default provider name.
    pub fn new(default_name: impl Into<String>) -> Self {
        Self {
            adapters: HashMap::new(),
            default_name: default_name.into(),
        }
    }

    /// Register an adapter. Replaces any existing adapter with the same name.
    pub fn register(&mut self, name: impl Into<String>, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(name.into(), adapter);
    }

    /// Get a specific adapter by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(name).cloned()
    }

    /// Get the default adapter.
    pub fn default_adapter(&self) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&self.default_name).cloned()
    }

    /// Resolve a provider name to an adapter, falling back to the default.
    pub fn resolve(&self, name: &str) -> std::result::Result<Arc<dyn ProviderAdapter>, ProviderError> {
        self.get(name)
            .or_else(|| self.default_adapter())
            .ok_or_else(|| ProviderError::NotConfigured(name.to_string()))
    }

    /// List all registered provider names.
    pub fn names(&self) -> Vec<&str> {
        self.adapters.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct EchoAdapter;

    #[async_trait]
    impl ProviderAdapter for EchoAdapter {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: request.prompt,
                model: request.model,
                usage: None,
            })
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = AdapterRegistry::new("echo");
        registry.register("echo", Arc::new(EchoAdapter));

        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert!(registry.default_adapter().is_some());
    }

    #[test]
    fn resolve_falls_back_to_default() {
        let mut registry = AdapterRegistry::new("echo");
        registry.register("echo", Arc::new(EchoAdapter));

        let adapter = registry.resolve("unknown-provider").unwrap();
        assert_eq!(adapter.name(), "echo");
    }

    #[test]
    fn resolve_errors_when_nothing_registered() {
        let registry = AdapterRegistry::new("echo");
        let err = registry.resolve("unknown-provider").unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn echo_adapter_round_trip() {
        let adapter = EchoAdapter;
        let response = adapter
            .complete(CompletionRequest::new("test-model", "hello"))
            .await
            .unwrap();
        assert_eq!(response.content, "hello");
        assert_eq!(response.model, "test-model");
    }
}
