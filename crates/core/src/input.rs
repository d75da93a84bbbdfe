//! Input unit — one piece of content contributed to a Context.
//!
//! An input carries an opaque payload, a caller-supplied relevance weight,
//! and a token cost estimate. Units are immutable after creation; the only
//! thing that ever produces a modified unit is the pruner, which builds a
//! truncated copy of a unit that does not fit the token budget.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::token;

/// A single input with relevance and token metadata.
///
/// Serialized as `{data, relevance, tokens}`. On deserialization,
/// `relevance` defaults to 1.0 and a missing `tokens` field is re-derived
/// from the content, matching what construction would have produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireInput")]
pub struct InputUnit {
    /// The opaque payload (text or structured value).
    #[serde(rename = "data")]
    pub content: Value,

    /// Relevance score, conventionally in [0, 1]; higher = more important.
    pub relevance: f64,

    /// Estimated token cost of the content.
    pub tokens: u32,
}

#[derive(Deserialize)]
struct WireInput {
    data: Value,
    #[serde(default = "default_relevance")]
    relevance: f64,
    #[serde(default)]
    tokens: Option<u32>,
}

fn default_relevance() -> f64 {
    1.0
}

impl From<WireInput> for InputUnit {
    fn from(wire: WireInput) -> Self {
        InputUnit::new(wire.data, wire.relevance, wire.tokens)
    }
}

impl InputUnit {
    /// Create a new input unit.
    ///
    /// When `tokens` is not supplied it is estimated from the content
    /// (string length, or JSON-serialized length for structured values,
    /// divided by 4 and rounded down).
    pub fn new(content: impl Into<Value>, relevance: f64, tokens: Option<u32>) -> Self {
        let content = content.into();
        let tokens = tokens.unwrap_or_else(|| token::estimate_value_tokens(&content));
        Self {
            content,
            relevance,
            tokens,
        }
    }

    /// Create a text input with the default relevance of 1.0.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(Value::String(content.into()), 1.0, None)
    }

    /// Whether the payload is plain text.
    pub fn is_text(&self) -> bool {
        self.content.is_string()
    }

    /// The payload as text, if it is plain text.
    pub fn as_text(&self) -> Option<&str> {
        self.content.as_str()
    }

    /// Render the payload for prompt assembly: strings verbatim,
    /// structured values as compact JSON.
    pub fn render(&self) -> String {
        match &self.content {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
