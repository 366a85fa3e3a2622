//! Handbook index abstraction.
//!
//! The RAG core only needs an ordered top-k lookup; ingestion additionally
//! needs to replace the stored chunks.

use crate::types::HandbookChunk;
use advisor_core::AppResult;

/// Trait for handbook vector index backends.
#[async_trait::async_trait]
pub trait HandbookIndex: Send + Sync {
    /// Return the texts of up to `top_k` chunks nearest to `query_embedding`.
    ///
    /// Results are in the index's own similarity order and may be fewer
    /// than `top_k`, or empty.
    async fn query(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<String>>;

    /// Insert embedded chunks.
    async fn add_chunks(&self, chunks: &[HandbookChunk]) -> AppResult<()>;

    /// Number of stored chunks.
    async fn count(&self) -> AppResult<usize>;

    /// Remove all chunks.
    async fn reset(&self) -> AppResult<()>;
}
