//! Knowledge system type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One chunk of handbook text as stored in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandbookChunk {
    /// Chunk identifier (`handbook_{position}`)
    pub id: String,

    /// Position of the chunk within the handbook
    pub position: u32,

    pub text: String,

    /// Embedding vector (None until embedded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl HandbookChunk {
    pub fn new(position: u32, text: impl Into<String>) -> Self {
        Self {
            id: format!("handbook_{}", position),
            position,
            text: text.into(),
            embedding: None,
        }
    }
}

/// Result of writing the subject store.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectIngestStats {
    /// Subjects written to the store
    pub subjects: usize,

    /// Files that could not be read
    pub skipped: usize,

    pub output: PathBuf,
}

/// Result of indexing the handbook.
#[derive(Debug, Clone, Serialize)]
pub struct HandbookIngestStats {
    pub chunks: usize,

    /// Characters in the source handbook
    pub characters: usize,

    pub embedding_dim: usize,

    pub ingested_at: DateTime<Utc>,

    pub duration_secs: f64,
}

/// Sizes of both knowledge sources.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeStats {
    pub subjects: usize,

    /// None when the handbook collection does not exist yet
    pub handbook_chunks: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_from_position() {
        let chunk = HandbookChunk::new(7, "Attendance policy");
        assert_eq!(chunk.id, "handbook_7");
        assert_eq!(chunk.position, 7);
        assert!(chunk.embedding.is_none());
    }

    #[test]
    fn test_chunk_serialization_skips_missing_embedding() {
        let json = serde_json::to_value(HandbookChunk::new(0, "text")).unwrap();
        assert!(json.get("embedding").is_none());
        assert_eq!(json["id"], "handbook_0");
    }
}
