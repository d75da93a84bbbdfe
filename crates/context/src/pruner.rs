//! Pruner — input selection under a relevance floor and token ceiling.
//!
//! The strategy is greedy, not a bin-packing solver:
//! 1. Filter by relevance threshold
//! 2. Sort by relevance (descending, stable on ties)
//! 3. Take inputs until the token limit is reached
//!
//! The first unit that would overflow the budget may be kept as a single
//! truncated copy when its content is text and enough budget remains to be
//! useful; everything after it in sort order is dropped.

use std::cmp::Ordering;

use promptbound_core::InputUnit;
use serde_json::Value;
use tracing::debug;

/// Remaining budget must exceed this many tokens before a partial input
/// is worth keeping.
const MIN_PARTIAL_TOKENS: u32 = 100;

/// Characters per token when sizing a truncated prefix. Must stay in step
/// with the estimation heuristic in `promptbound_core::token`.
const CHARS_PER_TOKEN: usize = 4;

/// Prunes inputs based on relevance and token constraints.
///
/// Stateless — construct one wherever it is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pruner;

impl Pruner {
    pub fn new() -> Self {
        Self
    }

    /// Prune `inputs` to fit the constraints.
    ///
    /// Every surviving unit has `relevance >= relevance_threshold`, and
    /// when `max_tokens` is supplied the surviving token total never
    /// exceeds it. Without a ceiling, the sorted survivors are returned
    /// unchanged.
    pub fn prune(
        &self,
        inputs: Vec<InputUnit>,
        max_tokens: Option<u32>,
        relevance_threshold: f64,
    ) -> Vec<InputUnit> {
        let mut survivors: Vec<InputUnit> = inputs
            .into_iter()
            .filter(|unit| unit.relevance >= relevance_threshold)
            .collect();

        // Stable sort: equal relevance keeps original relative order.
        survivors.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(Ordering::Equal)
        });

        let Some(max_tokens) = max_tokens else {
            return survivors;
        };

        let mut kept = Vec::new();
        let mut total = 0u32;

        for unit in survivors {
            if total + unit.tokens <= max_tokens {
                total += unit.tokens;
                kept.push(unit);
                continue;
            }

            // The first overflowing unit ends the pass. Text content may
            // still contribute a truncated prefix if enough budget remains.
            let remaining = max_tokens - total;
            if remaining > MIN_PARTIAL_TOKENS {
                if let Some(text) = unit.as_text() {
                    let prefix: String =
                        text.chars().take(remaining as usize * CHARS_PER_TOKEN).collect();
                    debug!(
                        remaining,
                        kept_chars = prefix.chars().count(),
                        "truncating overflowing input to fit budget"
                    );
                    kept.push(InputUnit::new(
                        Value::String(prefix),
                        unit.relevance,
                        Some(remaining),
                    ));
                }
            }
            break;
        }

        kept
    }
}
