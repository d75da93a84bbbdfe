//! Error types for the promptbound domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all promptbound operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Context errors ---
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Configuration errors ---
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors raised by Context construction and mutation.
///
/// These are validation errors: invalid or conflicting configuration is
/// rejected immediately, never silently corrected.
#[derive(Debug, Clone, Error)]
pub enum ContextError {
    #[error("Intent must not be empty")]
    EmptyIntent,

    #[error("Conflicting options: {0}")]
    ConflictingOptions(String),

    #[error("Invalid constraint '{name}': {reason}")]
    InvalidConstraint { name: String, reason: String },
}

/// Errors from the provider adapter boundary.
///
/// These surface verbatim to the `execute` caller — no retry, no
/// suppression, no translation.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
