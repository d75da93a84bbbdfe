//! # promptbound Context
//!
//! The bounded execution context and its collaborators. A [`Context`] is
//! one logical LLM task: inputs with relevance weights, named constraints,
//! routing state, output-shaping hints, and metadata. The [`Pruner`]
//! selects inputs under a token ceiling, the [`Router`] resolves a
//! model/provider pair from explicit choices or named strategies, and the
//! [`Executor`] flattens the surviving inputs into a prompt and performs
//! the single external boundary call.
//!
//! Collaborators are injected explicitly — a `Router` is passed to
//! [`Context::route`], an `Executor` to [`Context::execute`] — so there is
//! no hidden state tied to first-call order, and test suites can
//! substitute their own capability tables and adapters.

pub mod context;
pub mod executor;
pub mod pruner;
pub mod router;

pub use context::{Context, ContextOverrides};
pub use executor::{ExecuteRequest, Executor, ResponseEnvelope};
pub use pruner::Pruner;
pub use router::{ModelCatalog, ModelSpec, RouteRequest, Router};
