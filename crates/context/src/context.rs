//! The Context aggregate — a bounded execution unit for one LLM task.
//!
//! A Context carries inputs with relevance weights, named constraints,
//! routing state, output-shaping hints, and caller-owned metadata. It is
//! created explicitly, mutated in place by `add_input` / `prune` / `route`,
//! and derived from by `extend` and `merge`, which clone into new,
//! independent Contexts and never touch their sources.
//!
//! Serialization is round-trip safe: every field survives
//! `to_json` → `from_json` unchanged, so a Context can be handed to
//! another process or runtime and replayed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use promptbound_core::error::{ContextError, Result};
use promptbound_core::InputUnit;

use crate::executor::{ExecuteRequest, Executor, ResponseEnvelope};
use crate::pruner::Pruner;
use crate::router::{RouteRequest, Router};

/// The constraint key the pruner interprets.
const MAX_TOKENS_KEY: &str = "max_tokens";

/// A bounded execution context for LLM requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// Globally unique identifier, generated at creation unless supplied.
    pub id: String,

    /// Free-form task classification; never empty.
    pub intent: String,

    /// Optional secondary classification.
    pub category: Option<String>,

    /// Ordered inputs. Insertion order until a prune runs, after which
    /// the surviving set is ordered by descending relevance.
    #[serde(default)]
    pub inputs: Vec<InputUnit>,

    /// Named limits (`max_tokens`, `max_cost`, …). Open-ended; only
    /// `max_tokens` is interpreted, and only by `prune`.
    #[serde(default)]
    pub constraints: Map<String, Value>,

    /// Routing state: `model` / `provider` / `strategy` when set.
    #[serde(default)]
    pub routing: Map<String, Value>,

    /// Output-shaping hints (format, schema) — opaque to the core.
    #[serde(default)]
    pub output: Map<String, Value>,

    /// Caller-owned metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Back-reference to the Context this one was extended from.
    /// Informational only; never dereferenced.
    pub parent_id: Option<String>,

    /// Creation timestamp, UTC.
    pub created_at: DateTime<Utc>,
}

impl Context {
    /// Create a new Context with the given intent.
    ///
    /// An empty intent is a validation error, not something to correct.
    pub fn new(intent: impl Into<String>) -> Result<Self> {
        let intent = intent.into();
        if intent.is_empty() {
            return Err(ContextError::EmptyIntent.into());
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            intent,
            category: None,
            inputs: Vec::new(),
            constraints: Map::new(),
            routing: Map::new(),
            output: Map::new(),
            metadata: Map::new(),
            parent_id: None,
            created_at: Utc::now(),
        })
    }

    /// Replace the generated id with an explicit one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_constraints(mut self, constraints: Map<String, Value>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the `max_tokens` constraint.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.constraints
            .insert(MAX_TOKENS_KEY.into(), Value::from(max_tokens));
        self
    }

    pub fn with_routing(mut self, routing: Map<String, Value>) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_output(mut self, output: Map<String, Value>) -> Self {
        self.output = output;
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add an input to this context. Returns `&mut self` for chaining.
    ///
    /// `tokens` is estimated from the content when not supplied.
    pub fn add_input(
        &mut self,
        content: impl Into<Value>,
        relevance: f64,
        tokens: Option<u32>,
    ) -> &mut Self {
        self.inputs.push(InputUnit::new(content, relevance, tokens));
        self
    }

    /// The `max_tokens` constraint, when present.
    pub fn max_tokens_constraint(&self) -> Option<u32> {
        self.constraints
            .get(MAX_TOKENS_KEY)
            .and_then(Value::as_u64)
            .map(|v| v as u32)
    }

    /// Prune inputs to fit constraints.
    ///
    /// The ceiling is the explicit argument, or else the `max_tokens`
    /// constraint; with neither, only the relevance floor applies.
    pub fn prune(&mut self, max_tokens: Option<u32>, relevance_threshold: f64) -> &mut Self {
        let ceiling = max_tokens.or_else(|| self.max_tokens_constraint());
        let inputs = std::mem::take(&mut self.inputs);
        self.inputs = Pruner::new().prune(inputs, ceiling, relevance_threshold);
        self
    }

    /// Update routing through the given router.
    ///
    /// The router result is merged into the current routing: new keys are
    /// added or overwritten, unrelated keys are preserved.
    pub fn route(&mut self, router: &Router, request: &RouteRequest) -> &mut Self {
        let updated = router.route(&self.routing, request);
        for (key, value) in updated {
            self.routing.insert(key, value);
        }
        self
    }

    /// Execute this context with a task, through the given executor.
    pub async fn execute(
        &self,
        executor: &Executor,
        request: ExecuteRequest,
    ) -> Result<ResponseEnvelope> {
        executor.execute(self, request).await
    }

    /// Create a child context extending this one.
    ///
    /// The child clones this context's shapeable state, records this
    /// context's id as its `parent_id`, and gets a fresh id and creation
    /// timestamp. The intent defaults to the parent's.
    pub fn extend(&self, intent: Option<&str>) -> Result<Context> {
        self.extend_with(intent, ContextOverrides::default())
    }

    /// `extend` with explicit field overrides; `None` fields inherit.
    pub fn extend_with(&self, intent: Option<&str>, overrides: ContextOverrides) -> Result<Context> {
        let mut child = Context::new(intent.unwrap_or(&self.intent))?;
        child.category = overrides.category.or_else(|| self.category.clone());
        child.constraints = overrides
            .constraints
            .unwrap_or_else(|| self.constraints.clone());
        child.routing = overrides.routing.unwrap_or_else(|| self.routing.clone());
        child.output = overrides.output.unwrap_or_else(|| self.output.clone());
        child.metadata = overrides.metadata.unwrap_or_else(|| self.metadata.clone());
        child.inputs = overrides.inputs.unwrap_or_else(|| self.inputs.clone());
        child.parent_id = Some(self.id.clone());
        Ok(child)
    }

    /// Merge another context into a new one.
    ///
    /// This context's state is the base; inputs concatenate (self's
    /// first, no deduplication); the `max_tokens` constraint resolves to
    /// the most restrictive of the two; the other context's routing and
    /// metadata win on key conflicts. The result has a fresh id and no
    /// parent.
    pub fn merge(&self, other: &Context) -> Result<Context> {
        let mut merged = Context::new(&self.intent)?;
        merged.category = self.category.clone();
        merged.constraints = self.constraints.clone();
        merged.routing = self.routing.clone();
        merged.output = self.output.clone();
        merged.metadata = self.metadata.clone();

        merged.inputs = self
            .inputs
            .iter()
            .chain(other.inputs.iter())
            .cloned()
            .collect();

        if let Some(theirs) = other.max_tokens_constraint() {
            let ceiling = match merged.max_tokens_constraint() {
                Some(ours) => ours.min(theirs),
                None => theirs,
            };
            merged
                .constraints
                .insert(MAX_TOKENS_KEY.into(), Value::from(ceiling));
        }

        for (key, value) in other.routing.clone() {
            merged.routing.insert(key, value);
        }
        for (key, value) in other.metadata.clone() {
            merged.metadata.insert(key, value);
        }

        Ok(merged)
    }

    /// Total estimated tokens across current inputs.
    pub fn total_tokens(&self) -> u32 {
        self.inputs.iter().map(|unit| unit.tokens).sum()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    ///
    /// Malformed timestamps and missing required fields fail with a
    /// descriptive error; a partially valid Context is never returned.
    pub fn from_json(json: &str) -> Result<Self> {
        let context: Context = serde_json::from_str(json)?;
        if context.intent.is_empty() {
            return Err(ContextError::EmptyIntent.into());
        }
        Ok(context)
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short_id = self.id.get(..8).unwrap_or(&self.id);
        write!(
            f,
            "Context(id={}..., intent={}, inputs={}, tokens={})",
            short_id,
            self.intent,
            self.inputs.len(),
            self.total_tokens()
        )
    }
}

/// Field overrides for [`Context::extend_with`]. `None` inherits from
/// the parent.
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub category: Option<String>,
    pub constraints: Option<Map<String, Value>>,
    pub routing: Option<Map<String, Value>>,
    pub output: Option<Map<String, Value>>,
    pub metadata: Option<Map<String, Value>>,
    pub inputs: Option<Vec<InputUnit>>,
}
