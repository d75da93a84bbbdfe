//! Built-in pricing table and budget conversion.
//!
//! Prices are in USD per 1 million tokens. The budget→token conversion
//! uses a weighted average price (30% input, 70% output) and a 20% safety
//! margin; both constants are load-bearing for budget compatibility and
//! must not be tuned.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use promptbound_core::adapter::Usage;

/// Model whose pricing stands in for unknown models.
pub const DEFAULT_PRICING_MODEL: &str = "gpt-4o-mini";

/// Assumed share of input tokens in a completion call.
const INPUT_WEIGHT: f64 = 0.3;
/// Assumed share of output tokens in a completion call.
const OUTPUT_WEIGHT: f64 = 0.7;
/// Fraction of the budget actually spent; the rest is safety margin.
const BUDGET_MARGIN: f64 = 0.8;

/// Per-million-token pricing for a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Price per 1M input tokens in USD.
    pub input_per_m: f64,
    /// Price per 1M output tokens in USD.
    pub output_per_m: f64,
}

impl ModelPricing {
    /// Create a new pricing entry.
    pub fn new(input_per_m: f64, output_per_m: f64) -> Self {
        Self {
            input_per_m,
            output_per_m,
        }
    }

    /// Compute cost in USD for the given token counts.
    pub fn cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        (input_tokens as f64 * self.input_per_m + output_tokens as f64 * self.output_per_m)
            / 1_000_000.0
    }
}

/// Thread-safe pricing table with built-in defaults and custom overrides.
pub struct PricingTable {
    prices: RwLock<HashMap<String, ModelPricing>>,
}

impl PricingTable {
    /// Create a pricing table with built-in model prices.
    pub fn with_defaults() -> Self {
        let mut prices = HashMap::new();
        prices.insert("gpt-4o-mini".into(), ModelPricing::new(0.15, 0.6));
        prices.insert("gpt-4o".into(), ModelPricing::new(2.5, 10.0));
        prices.insert("gpt-4".into(), ModelPricing::new(30.0, 60.0));

        Self {
            prices: RwLock::new(prices),
        }
    }

    /// Create an empty pricing table.
    pub fn empty() -> Self {
        Self {
            prices: RwLock::new(HashMap::new()),
        }
    }

    /// Look up pricing for a model. Returns None if not found.
    pub fn get(&self, model: &str) -> Option<ModelPricing> {
        let prices = self.prices.read().unwrap();
        prices.get(model).cloned()
    }

    /// Pricing for a model, or the stand-in default for unknown models.
    pub fn get_or_default(&self, model: &str) -> ModelPricing {
        self.get(model)
            .or_else(|| self.get(DEFAULT_PRICING_MODEL))
            .unwrap_or_else(|| ModelPricing::new(0.15, 0.6))
    }

    /// Add or update pricing for a model.
    pub fn set(&self, model: impl Into<String>, pricing: ModelPricing) {
        let mut prices = self.prices.write().unwrap();
        prices.insert(model.into(), pricing);
    }

    /// Convert a USD budget into an approximate completion token ceiling.
    ///
    /// Uses a weighted average of input and output prices (30/70) and
    /// keeps 20% of the budget as safety margin.
    pub fn budget_to_max_tokens(&self, budget_usd: f64, model: &str) -> u32 {
        let pricing = self.get_or_default(model);
        let input_per_token = pricing.input_per_m / 1_000_000.0;
        let output_per_token = pricing.output_per_m / 1_000_000.0;
        let avg_price_per_token = INPUT_WEIGHT * input_per_token + OUTPUT_WEIGHT * output_per_token;

        ((budget_usd * BUDGET_MARGIN) / avg_price_per_token) as u32
    }

    /// Compute the USD cost of a completed call from reported usage.
    pub fn usage_cost(&self, usage: &Usage, model: &str) -> f64 {
        self.get_or_default(model)
            .cost(usage.prompt_tokens, usage.completion_tokens)
    }

    /// List all known model names, sorted.
    pub fn models(&self) -> Vec<String> {
        let prices = self.prices.read().unwrap();
        let mut names: Vec<String> = prices.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of models in the pricing table.
    pub fn len(&self) -> usize {
        self.prices.read().unwrap().len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_models() {
        let table = PricingTable::with_defaults();
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn known_model_cost() {
        let table = PricingTable::with_defaults();

        // gpt-4o-mini: $0.15/M input, $0.60/M output
        let cost = table.usage_cost(
            &Usage {
                prompt_tokens: 1000,
                completion_tokens: 500,
                total_tokens: 1500,
            },
            "gpt-4o-mini",
        );
        // (1000 * 0.15 + 500 * 0.6) / 1M = 0.00045
        assert!((cost - 0.00045).abs() < 1e-12);
    }

    #[test]
    fn unknown_model_uses_default_pricing() {
        let table = PricingTable::with_defaults();
        let usage = Usage {
            prompt_tokens: 1000,
            completion_tokens: 500,
            total_tokens: 1500,
        };
        let unknown = table.usage_cost(&usage, "mystery-model");
        let known = table.usage_cost(&usage, DEFAULT_PRICING_MODEL);
        assert!((unknown - known).abs() < 1e-12);
    }

    #[test]
    fn budget_conversion_applies_margin_and_weighting() {
        let table = PricingTable::with_defaults();

        // gpt-4o-mini: avg price/token = 0.3*0.15e-6 + 0.7*0.6e-6 = 0.465e-6
        // 0.05 budget * 0.8 / 0.465e-6 = 86021.5 → 86021
        assert_eq!(table.budget_to_max_tokens(0.05, "gpt-4o-mini"), 86021);
    }

    #[test]
    fn budget_conversion_scales_with_model_price() {
        let table = PricingTable::with_defaults();
        let cheap = table.budget_to_max_tokens(0.05, "gpt-4o-mini");
        let expensive = table.budget_to_max_tokens(0.05, "gpt-4");
        assert!(expensive < cheap);
    }

    #[test]
    fn custom_pricing_overrides() {
        let table = PricingTable::with_defaults();
        table.set("gpt-4o", ModelPricing::new(5.0, 20.0));

        let cost = table.usage_cost(
            &Usage {
                prompt_tokens: 1_000_000,
                completion_tokens: 0,
                total_tokens: 1_000_000,
            },
            "gpt-4o",
        );
        assert!((cost - 5.0).abs() < 1e-10);
    }

    #[test]
    fn list_models_sorted() {
        let table = PricingTable::with_defaults();
        let models = table.models();
        assert!(models.contains(&"gpt-4".to_string()));
        assert!(models.windows(2).all(|w| w[0] <= w[1]));
    }
}
