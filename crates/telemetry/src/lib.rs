//! # promptbound Telemetry
//!
//! Cost accounting around the execution boundary: a pricing table for
//! common models, conversion of a USD budget into a token ceiling, and
//! the Markdown run dashboard.

pub mod dashboard;
pub mod pricing;

pub use dashboard::{render_dashboard, write_dashboard};
pub use pricing::{ModelPricing, PricingTable, DEFAULT_PRICING_MODEL};
