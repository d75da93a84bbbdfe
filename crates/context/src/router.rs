//! Router — model and provider selection.
//!
//! The router resolves a routing intent (an explicit model/provider, or a
//! named strategy) into a concrete `(model, provider)` pair using a
//! capability table. The table is injected at construction so test suites
//! and alternate deployments can substitute their own data;
//! `Router::default()` wires the built-in table.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// The balanced fallback used for unrecognized strategies.
pub const DEFAULT_BALANCED_MODEL: &str = "gpt-3.5-turbo";

/// Capability data for one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub provider: String,
    pub max_tokens: u32,
    pub cost_per_1k_input: f64,
    pub cost_per_1k_output: f64,
    /// Quality score in [0, 1].
    pub quality: f64,
    /// Speed score in [0, 1].
    pub speed: f64,
}

/// An ordered capability table.
///
/// Entries iterate in insertion order, and min/max selections keep the
/// first entry seen on ties — selection is deterministic for a fixed
/// table ordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelCatalog {
    models: Vec<ModelSpec>,
}

impl ModelCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self { models: Vec::new() }
    }

    /// The built-in capability table.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.push(ModelSpec {
            name: "gpt-4".into(),
            provider: "openai".into(),
            max_tokens: 8192,
            cost_per_1k_input: 0.03,
            cost_per_1k_output: 0.06,
            quality: 0.95,
            speed: 0.6,
        });
        catalog.push(ModelSpec {
            name: "gpt-3.5-turbo".into(),
            provider: "openai".into(),
            max_tokens: 4096,
            cost_per_1k_input: 0.0015,
            cost_per_1k_output: 0.002,
            quality: 0.75,
            speed: 0.9,
        });
        catalog.push(ModelSpec {
            name: "claude-3-opus".into(),
            provider: "anthropic".into(),
            max_tokens: 4096,
            cost_per_1k_input: 0.015,
            cost_per_1k_output: 0.075,
            quality: 0.95,
            speed: 0.7,
        });
        catalog.push(ModelSpec {
            name: "claude-3-sonnet".into(),
            provider: "anthropic".into(),
            max_tokens: 4096,
            cost_per_1k_input: 0.003,
            cost_per_1k_output: 0.015,
            quality: 0.85,
            speed: 0.85,
        });
        catalog
    }

    /// Append a model spec. Order is significant for tie-breaking.
    pub fn push(&mut self, spec: ModelSpec) {
        self.models.push(spec);
    }

    /// Look up a model by name.
    pub fn get(&self, name: &str) -> Option<&ModelSpec> {
        self.models.iter().find(|spec| spec.name == name)
    }

    /// Iterate the table in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelSpec> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// The model with the lowest input cost; first entry wins ties.
    fn cheapest(&self) -> Option<&ModelSpec> {
        let mut best: Option<&ModelSpec> = None;
        for spec in &self.models {
            match best {
                Some(b) if spec.cost_per_1k_input >= b.cost_per_1k_input => {}
                _ => best = Some(spec),
            }
        }
        best
    }

    /// The model with the highest quality score; first entry wins ties.
    fn highest_quality(&self) -> Option<&ModelSpec> {
        let mut best: Option<&ModelSpec> = None;
        for spec in &self.models {
            match best {
                Some(b) if spec.quality <= b.quality => {}
                _ => best = Some(spec),
            }
        }
        best
    }

    /// The model with the highest speed score; first entry wins ties.
    fn fastest(&self) -> Option<&ModelSpec> {
        let mut best: Option<&ModelSpec> = None;
        for spec in &self.models {
            match best {
                Some(b) if spec.speed <= b.speed => {}
                _ => best = Some(spec),
            }
        }
        best
    }
}

/// The routing intent for one `route` call.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    /// Explicit model selection.
    pub model: Option<String>,
    /// Explicit provider selection.
    pub provider: Option<String>,
    /// Named strategy: `cost_optimized`, `quality_optimized`,
    /// `speed_optimized`; anything else resolves to the balanced default.
    pub strategy: Option<String>,
}

impl RouteRequest {
    pub fn model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Default::default()
        }
    }

    pub fn provider(provider: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            ..Default::default()
        }
    }

    pub fn strategy(strategy: impl Into<String>) -> Self {
        Self {
            strategy: Some(strategy.into()),
            ..Default::default()
        }
    }
}

/// Routes execution to an appropriate model and provider.
pub struct Router {
    catalog: ModelCatalog,
}

impl Router {
    /// Create a router over the given capability table.
    pub fn new(catalog: ModelCatalog) -> Self {
        Self { catalog }
    }

    /// The capability table this router resolves against.
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Determine the updated routing configuration.
    ///
    /// An explicit model takes precedence and is enriched with its
    /// provider from the table when known; an explicit provider then
    /// overwrites that enrichment. A strategy only applies when no model
    /// is present afterwards. Unrecognized models and providers pass
    /// through untouched — routing never fails.
    pub fn route(&self, current: &Map<String, Value>, request: &RouteRequest) -> Map<String, Value> {
        let mut routing = current.clone();

        if let Some(model) = &request.model {
            routing.insert("model".into(), Value::String(model.clone()));
            if let Some(spec) = self.catalog.get(model) {
                routing.insert("provider".into(), Value::String(spec.provider.clone()));
            }
        }

        if let Some(provider) = &request.provider {
            routing.insert("provider".into(), Value::String(provider.clone()));
        }

        if let Some(strategy) = &request.strategy {
            routing.insert("strategy".into(), Value::String(strategy.clone()));
            if !routing.contains_key("model") {
                let model = self.select_by_strategy(strategy);
                debug!(strategy = %strategy, model = %model, "strategy resolved model");
                if let Some(spec) = self.catalog.get(&model) {
                    routing.insert("provider".into(), Value::String(spec.provider.clone()));
                }
                routing.insert("model".into(), Value::String(model));
            }
        }

        routing
    }

    /// Select a model name for a named strategy.
    fn select_by_strategy(&self, strategy: &str) -> String {
        let selected = match strategy {
            "cost_optimized" => self.catalog.cheapest(),
            "quality_optimized" => self.catalog.highest_quality(),
            "speed_optimized" => self.catalog.fastest(),
            _ => None,
        };
        selected
            .map(|spec| spec.name.clone())
            .unwrap_or_else(|| DEFAULT_BALANCED_MODEL.to_string())
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(ModelCatalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_one(request: RouteRequest) -> Map<String, Value> {
        Router::default().route(&Map::new(), &request)
    }

    fn model_of(routing: &Map<String, Value>) -> &str {
        routing.get("model").and_then(Value::as_str).unwrap()
    }

    fn provider_of(routing: &Map<String, Value>) -> &str {
        routing.get("provider").and_then(Value::as_str).unwrap()
    }

    #[test]
    fn explicit_model_enriched_with_provider() {
        let routing = route_one(RouteRequest::model("claude-3-opus"));
        assert_eq!(model_of(&routing), "claude-3-opus");
        assert_eq!(provider_of(&routing), "anthropic");
    }

    #[test]
    fn unknown_model_passes_through_without_provider() {
        let routing = route_one(RouteRequest::model("some-local-model"));
        assert_eq!(model_of(&routing), "some-local-model");
        assert!(!routing.contains_key("provider"));
    }

    #[test]
    fn explicit_provider_overrides_table_enrichment() {
        let request = RouteRequest {
            model: Some("gpt-4".into()),
            provider: Some("azure".into()),
            strategy: None,
        };
        let routing = route_one(request);
        assert_eq!(model_of(&routing), "gpt-4");
        assert_eq!(provider_of(&routing), "azure");
    }

    #[test]
    fn cost_strategy_selects_cheapest() {
        let routing = route_one(RouteRequest::strategy("cost_optimized"));
        assert_eq!(model_of(&routing), "gpt-3.5-turbo");
        assert_eq!(provider_of(&routing), "openai");
    }

    #[test]
    fn quality_strategy_breaks_tie_by_table_order() {
        // gpt-4 and claude-3-opus share the top quality score; gpt-4 is
        // iterated first and wins
        let routing = route_one(RouteRequest::strategy("quality_optimized"));
        assert_eq!(model_of(&routing), "gpt-4");
        assert_eq!(provider_of(&routing), "openai");
    }

    #[test]
    fn speed_strategy_selects_fastest() {
        let routing = route_one(RouteRequest::strategy("speed_optimized"));
        assert_eq!(model_of(&routing), "gpt-3.5-turbo");
    }

    #[test]
    fn unrecognized_strategy_uses_balanced_default() {
        let routing = route_one(RouteRequest::strategy("vibes_optimized"));
        assert_eq!(model_of(&routing), DEFAULT_BALANCED_MODEL);
        assert_eq!(provider_of(&routing), "openai");
    }

    #[test]
    fn strategy_ignored_when_model_already_routed() {
        let mut current = Map::new();
        current.insert("model".into(), Value::String("gpt-4".into()));

        let routing = Router::default().route(&current, &RouteRequest::strategy("cost_optimized"));
        assert_eq!(model_of(&routing), "gpt-4");
    }

    #[test]
    fn existing_keys_are_preserved() {
        let mut current = Map::new();
        current.insert("temperature".into(), Value::from(0.2));

        let routing = Router::default().route(&current, &RouteRequest::model("gpt-4"));
        assert_eq!(routing.get("temperature"), Some(&Value::from(0.2)));
    }

    #[test]
    fn injected_catalog_replaces_builtin() {
        let mut catalog = ModelCatalog::new();
        catalog.push(ModelSpec {
            name: "house-model".into(),
            provider: "in-house".into(),
            max_tokens: 2048,
            cost_per_1k_input: 0.0001,
            cost_per_1k_output: 0.0002,
            quality: 0.5,
            speed: 0.5,
        });
        let router = Router::new(catalog);

        let routing = router.route(&Map::new(), &RouteRequest::strategy("cost_optimized"));
        assert_eq!(model_of(&routing), "house-model");
        assert_eq!(provider_of(&routing), "in-house");
    }

    #[test]
    fn empty_catalog_strategy_falls_back_to_default() {
        let router = Router::new(ModelCatalog::new());
        let routing = router.route(&Map::new(), &RouteRequest::strategy("cost_optimized"));
        assert_eq!(model_of(&routing), DEFAULT_BALANCED_MODEL);
        assert!(!routing.contains_key("provider"));
    }
}
