//! Executor — prompt assembly and the single external boundary call.
//!
//! The executor flattens a Context's surviving inputs and a task
//! description into one prompt, resolves the target adapter through its
//! registry, performs the call, and wraps the result in a response
//! envelope with timing and usage metadata. Adapter failures propagate to
//! the caller uninterpreted: no retries, no error translation.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use promptbound_core::adapter::{AdapterRegistry, CompletionRequest, Usage};
use promptbound_core::error::Result;

use crate::context::Context;

/// Model used when routing names none.
pub const FALLBACK_MODEL: &str = "gpt-3.5-turbo";

/// Provider used when routing names none.
pub const FALLBACK_PROVIDER: &str = "openai";

/// One execution request: the task plus optional shaping.
#[derive(Debug, Clone, Default)]
pub struct ExecuteRequest {
    /// Task description or prompt.
    pub task: String,

    /// Optional system prompt, rendered at the top of the flattened prompt.
    pub system_prompt: Option<String>,

    /// Routing overrides for this execution only; merged over the
    /// Context's routing, never written back.
    pub override_routing: Option<Map<String, Value>>,

    /// Optional caller instructions, passed through to the adapter.
    pub instructions: Option<String>,
}

impl ExecuteRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Default::default()
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_override_routing(mut self, routing: Map<String, Value>) -> Self {
        self.override_routing = Some(routing);
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }
}

/// The structured result of one execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// The raw text returned by the provider.
    pub result: String,

    /// Id of the Context that was executed.
    pub context_id: String,

    /// The model the request was resolved to.
    pub model_used: String,

    /// The provider the request was resolved to.
    pub provider_used: String,

    /// Wall-clock duration of the boundary call, in milliseconds.
    pub duration_ms: u64,

    /// Token usage, when the backend reports it.
    pub usage: Option<Usage>,

    /// Execution metadata.
    pub metadata: EnvelopeMetadata,
}

/// Metadata describing the executed Context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
    pub intent: String,
    pub input_count: usize,
    pub total_input_tokens: u32,
}

/// Executes Contexts against LLM backends through an adapter registry.
pub struct Executor {
    registry: AdapterRegistry,
}

impl Executor {
    /// Create an executor over the given registry.
    pub fn new(registry: AdapterRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Execute a context with a request.
    pub async fn execute(
        &self,
        context: &Context,
        request: ExecuteRequest,
    ) -> Result<ResponseEnvelope> {
        let started = Instant::now();

        // Per-execution overrides win over the Context's routing.
        let mut routing = context.routing.clone();
        if let Some(overrides) = &request.override_routing {
            for (key, value) in overrides {
                routing.insert(key.clone(), value.clone());
            }
        }

        let model = routing
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(FALLBACK_MODEL)
            .to_string();
        let provider = routing
            .get("provider")
            .and_then(Value::as_str)
            .unwrap_or(FALLBACK_PROVIDER)
            .to_string();

        let prompt = render_prompt(context, &request);
        let adapter = self.registry.resolve(&provider)?;

        debug!(provider = %provider, model = %model, prompt_chars = prompt.len(),
            "dispatching completion request");

        let response = adapter
            .complete(CompletionRequest {
                model: model.clone(),
                prompt,
                max_tokens: context.max_tokens_constraint(),
                instructions: request.instructions.clone(),
                routing,
            })
            .await?;

        Ok(ResponseEnvelope {
            result: response.content,
            context_id: context.id.clone(),
            model_used: model,
            provider_used: provider,
            duration_ms: started.elapsed().as_millis() as u64,
            usage: response.usage,
            metadata: EnvelopeMetadata {
                intent: context.intent.clone(),
                input_count: context.inputs.len(),
                total_input_tokens: context.total_tokens(),
            },
        })
    }
}

/// Flatten a context and request into a single prompt.
///
/// Layout: optional system-prompt line, a "Context:" section listing each
/// input's content in current order (structured values stringified), then
/// the task text.
fn render_prompt(context: &Context, request: &ExecuteRequest) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(system_prompt) = &request.system_prompt {
        parts.push(format!("System: {system_prompt}\n"));
    }

    if !context.inputs.is_empty() {
        parts.push("Context:\n".into());
        for input in &context.inputs {
            parts.push(input.render());
            parts.push("\n".into());
        }
    }

    parts.push(format!("\nTask: {}", request.task));

    parts.join("\n")
}
