//! Knowledge sources and question answering for the degree program advisor.
//!
//! Two sources feed the answers:
//! - the **subject store**, a JSON map from subject key to document text
//! - the **handbook index**, chunked handbook text in LanceDB
//!
//! [`rag::ask`] routes a question to one of them, builds the context and
//! generates the answer.

pub mod chunker;
pub mod embeddings;
pub mod ingest;
pub mod lancedb_index;
pub mod rag;
pub mod subjects;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use ingest::{ingest_all, ingest_handbook, ingest_subjects, IngestReport};
pub use rag::{ask, route, AssistantContext, Exchange, QueryType, RouterDecision};
pub use subjects::SubjectStore;
pub use types::{HandbookChunk, HandbookIngestStats, KnowledgeStats, SubjectIngestStats};
pub use vector_index::HandbookIndex;

use advisor_core::{AppConfig, AppResult};
use lancedb_index::LanceDbIndex;

/// Report the size of both knowledge sources without building a full context.
///
/// Missing sources are reported, not treated as errors.
pub async fn knowledge_stats(config: &AppConfig) -> AppResult<KnowledgeStats> {
    let subjects_path = config.subjects_path();
    let subjects = if subjects_path.exists() {
        SubjectStore::load(&subjects_path)?.len()
    } else {
        tracing::debug!("No subject store at {:?}", subjects_path);
        0
    };

    let handbook_chunks =
        match LanceDbIndex::open(&config.handbook_db_path(), &config.knowledge.collection).await {
            Ok(index) => Some(index.count().await?),
            Err(e) => {
                tracing::debug!("Handbook collection unavailable: {}", e);
                None
            }
        };

    Ok(KnowledgeStats {
        subjects,
        handbook_chunks,
    })
}
