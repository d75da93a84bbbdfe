//! # promptbound Core
//!
//! Domain types, traits, and error definitions for the promptbound
//! request-shaping layer. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The provider boundary is defined as a trait here; HTTP implementations
//! live in `promptbound-providers`. This enables:
//! - Swapping backends via configuration
//! - Easy testing with scripted mock adapters
//! - Clean dependency graph (all crates depend inward on core)

pub mod adapter;
pub mod error;
pub mod input;
pub mod token;

// Re-export key types at crate root for ergonomics
pub use adapter::{AdapterRegistry, CompletionRequest, CompletionResponse, ProviderAdapter, Usage};
pub use error::{ConfigError, ContextError, Error, ProviderError, Result};
pub use input::InputUnit;
