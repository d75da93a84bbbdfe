//! # promptbound Providers
//!
//! `ProviderAdapter` implementations over HTTP: OpenAI-compatible
//! endpoints (OpenAI, OpenRouter, LiteLLM proxies, Ollama, vLLM, …) and
//! the native Anthropic Messages API, plus registry construction from
//! configuration.

pub mod anthropic;
pub mod openai_compat;
pub mod registry;

pub use anthropic::AnthropicAdapter;
pub use openai_compat::OpenAiCompatAdapter;
pub use registry::{build_from_config, default_base_url};
