//! Reasoning-service integration for the degree program advisor.
//!
//! A provider-agnostic `LlmClient` trait with two transports:
//! - **Ollama**: local runtime (default)
//! - **OpenAI-compatible**: Groq, OpenAI
//!
//! Structured output (a response constrained to a JSON shape) goes through
//! [`complete_structured`], which decodes and rejects malformed replies locally.
//!
//! # Example
//! ```no_run
//! use advisor_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.1:8b");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod structured;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient};
pub use structured::{complete_structured, parse_structured, StructuredOutput};
pub use types::ProviderType;
