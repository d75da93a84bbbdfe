//! Adapter registry construction — wires adapters from configuration.

use std::sync::Arc;

use promptbound_config::AppConfig;
use promptbound_core::adapter::{AdapterRegistry, ProviderAdapter};

use crate::anthropic::AnthropicAdapter;
use crate::openai_compat::OpenAiCompatAdapter;

/// Build an adapter registry from configuration.
///
/// Every configured provider gets an adapter; the default provider is
/// created even when not explicitly configured, pointed at the proxy URL
/// when one is set.
pub fn build_from_config(config: &AppConfig) -> AdapterRegistry {
    let mut registry = AdapterRegistry::new(&config.default_provider);

    for (name, provider_config) in &config.providers {
        let api_key = provider_config
            .api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();

        let base_url = provider_config
            .api_url
            .clone()
            .unwrap_or_else(|| default_base_url(name));

        let adapter: Arc<dyn ProviderAdapter> = if name == "anthropic" {
            // Native Messages API for direct Anthropic access
            let mut adapter = AnthropicAdapter::new(&api_key);
            if provider_config.api_url.is_some() {
                adapter = adapter.with_base_url(&base_url);
            }
            Arc::new(adapter)
        } else {
            Arc::new(OpenAiCompatAdapter::new(name, &base_url, &api_key))
        };

        registry.register(name.clone(), adapter);
    }

    // Ensure the default provider exists (even if not explicitly configured)
    if registry.get(&config.default_provider).is_none() {
        let api_key = config.api_key.clone().unwrap_or_default();
        let base_url = config
            .proxy_url
            .clone()
            .unwrap_or_else(|| default_base_url(&config.default_provider));

        let adapter: Arc<dyn ProviderAdapter> = if config.default_provider == "anthropic" {
            Arc::new(AnthropicAdapter::new(&api_key))
        } else {
            Arc::new(OpenAiCompatAdapter::new(
                &config.default_provider,
                &base_url,
                &api_key,
            ))
        };

        registry.register(config.default_provider.clone(), adapter);
    }

    registry
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "anthropic" => "https://api.anthropic.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "fireworks" => "https://api.fireworks.ai/inference/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "litellm" | "proxy" => "http://localhost:4000".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptbound_config::ProviderConfig;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("openrouter").contains("openrouter.ai"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
        assert!(default_base_url("litellm").contains("localhost:4000"));
    }

    #[test]
    fn build_from_default_config() {
        let config = AppConfig::default();
        let registry = build_from_config(&config);
        assert!(registry.default_adapter().is_some());
        assert!(registry.get("openai").is_some());
    }

    #[test]
    fn configured_providers_are_registered() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "anthropic".into(),
            ProviderConfig {
                api_key: Some("sk-ant".into()),
                ..Default::default()
            },
        );

        let registry = build_from_config(&config);
        assert!(registry.get("anthropic").is_some());
        assert!(registry.get("openai").is_some());
        assert_eq!(registry.get("anthropic").unwrap().name(), "anthropic");
    }

    #[test]
    fn unknown_provider_resolves_to_default() {
        let config = AppConfig::default();
        let registry = build_from_config(&config);
        let adapter = registry.resolve("not-a-provider").unwrap();
        assert_eq!(adapter.name(), "openai");
    }
}
