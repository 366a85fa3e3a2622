//! Embedding providers for handbook retrieval.
//!
//! The same provider embeds handbook chunks at ingestion time and questions
//! at query time, so both sides share one vector space.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
