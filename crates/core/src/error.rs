//! Error types for the degree program advisor.
//!
//! One enum covers every failure category in the workspace: configuration,
//! I/O, reasoning-service calls, knowledge stores, prompts, and routing.

use thiserror::Error;

/// Unified error type for the advisor.
///
/// Startup failures (`Config`, `Prompt`, `Knowledge` while loading stores)
/// stop the process. Failures raised while answering a question (`Llm`,
/// `Routing`, `Knowledge` from the index) end only that exchange.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reasoning service errors (completion, structured output)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Subject store, embedding, and handbook index errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Router output that does not decode into a valid decision
    #[error("Routing error: {0}")]
    Routing(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
