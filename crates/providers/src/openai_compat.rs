//! OpenAI-compatible provider adapter.
//!
//! Works with: OpenAI, OpenRouter, LiteLLM proxies, Ollama, vLLM,
//! Together AI, Fireworks AI, and any endpoint exposing an
//! OpenAI-compatible `/chat/completions` route.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use promptbound_core::adapter::{
    CompletionRequest, CompletionResponse, ProviderAdapter, Usage,
};
use promptbound_core::error::ProviderError;

const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

/// An OpenAI-compatible LLM adapter.
///
/// This handles the vast majority of backends, since most expose an
/// OpenAI-compatible chat-completions endpoint.
#[derive(Debug)]
pub struct OpenAiCompatAdapter {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatAdapter {
    /// Create a new OpenAI-compatible adapter.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create an OpenAI adapter (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Create an adapter for a local LiteLLM-style proxy.
    pub fn proxy(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::new("proxy", base_url, api_key)
    }

    /// Build the messages payload: default system message, optional
    /// caller instructions, then the flattened prompt.
    fn to_api_messages(request: &CompletionRequest) -> Vec<ApiMessage> {
        let mut messages = vec![ApiMessage {
            role: "system".into(),
            content: DEFAULT_SYSTEM_MESSAGE.into(),
        }];

        if let Some(instructions) = &request.instructions {
            messages.push(ApiMessage {
                role: "user".into(),
                content: format!("Instructions: {instructions}"),
            });
        }

        messages.push(ApiMessage {
            role: "user".into(),
            content: request.prompt.clone(),
        });

        messages
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request),
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        debug!(adapter = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice =
            api_response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::ApiError {
                    status_code: 200,
                    message: "No choices in response".into(),
                })?;

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            model: api_response.model,
            usage,
        })
    }
}

// --- Wire types ---

#[derive(Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let adapter = OpenAiCompatAdapter::new("test", "http://localhost:4000/", "sk-test");
        assert_eq!(adapter.base_url, "http://localhost:4000");
    }

    #[test]
    fn messages_include_system_and_prompt() {
        let request = CompletionRequest::new("gpt-4o-mini", "the prompt");
        let messages = OpenAiCompatAdapter::to_api_messages(&request);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, DEFAULT_SYSTEM_MESSAGE);
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "the prompt");
    }

    #[test]
    fn instructions_message_precedes_prompt() {
        let mut request = CompletionRequest::new("gpt-4o-mini", "the prompt");
        request.instructions = Some("be brief".into());

        let messages = OpenAiCompatAdapter::to_api_messages(&request);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].content, "Instructions: be brief");
        assert_eq!(messages[2].content, "the prompt");
    }

    #[test]
    fn api_response_parses() {
        let json = r#"{
            "model": "gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": "hello"}}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hello"));
        assert_eq!(parsed.usage.unwrap().total_tokens, 12);
    }
}
