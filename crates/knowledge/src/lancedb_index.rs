//! LanceDB-backed handbook index.

use crate::types::HandbookChunk;
use crate::vector_index::HandbookIndex;
use advisor_core::{AppError, AppResult};
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
    UInt32Array,
};
use arrow_schema::{DataType, Field, Schema};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, Table};
use std::path::Path;
use std::sync::Arc;

const TEXT_COLUMN: &str = "text";
const EMBEDDING_COLUMN: &str = "embedding";

/// Handbook chunks stored in a LanceDB table.
pub struct LanceDbIndex {
    table: Table,
    embedding_dim: usize,
}

impl LanceDbIndex {
    /// Open an existing handbook collection.
    ///
    /// Fails when the database or the table does not exist; the handbook
    /// must be ingested before questions can be answered from it.
    pub async fn open(db_path: &Path, table_name: &str) -> AppResult<Self> {
        if !db_path.exists() {
            return Err(missing_collection(db_path, table_name));
        }

        let conn = connect(db_path).await?;

        if !table_names(&conn).await?.iter().any(|n| n == table_name) {
            return Err(missing_collection(db_path, table_name));
        }

        let table = conn
            .open_table(table_name)
            .execute()
            .await
            .map_err(|e| AppError::Knowledge(format!("Failed to open table: {}", e)))?;

        let embedding_dim = embedding_dim_of(&table).await?;

        tracing::debug!(
            "Opened handbook collection '{}' at {:?} (dim {})",
            table_name,
            db_path,
            embedding_dim
        );

        Ok(Self {
            table,
            embedding_dim,
        })
    }

    /// Open the collection, creating an empty one if needed.
    ///
    /// An existing collection must have the requested embedding dimension.
    pub async fn create_or_open(
        db_path: &Path,
        table_name: &str,
        embedding_dim: usize,
    ) -> AppResult<Self> {
        std::fs::create_dir_all(db_path).map_err(|e| {
            AppError::Knowledge(format!("Failed to create index directory: {}", e))
        })?;

        let conn = connect(db_path).await?;

        let table = if table_names(&conn).await?.iter().any(|n| n == table_name) {
            let table = conn
                .open_table(table_name)
                .execute()
                .await
                .map_err(|e| AppError::Knowledge(format!("Failed to open table: {}", e)))?;

            let existing = embedding_dim_of(&table).await?;
            if existing != embedding_dim {
                return Err(AppError::Knowledge(format!(
                    "Collection '{}' stores {}-dimensional embeddings but the embedding model produces {}. Delete {:?} and ingest again.",
                    table_name, existing, embedding_dim, db_path
                )));
            }
            table
        } else {
            let schema = Self::create_schema(embedding_dim);
            let empty_batch = RecordBatch::new_empty(schema.clone());

            conn.create_table(
                table_name,
                RecordBatchIterator::new(vec![Ok(empty_batch)], schema),
            )
            .execute()
            .await
            .map_err(|e| AppError::Knowledge(format!("Failed to create table: {}", e)))?
        };

        tracing::debug!("Initialized handbook collection '{}' at {:?}", table_name, db_path);

        Ok(Self {
            table,
            embedding_dim,
        })
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    fn create_schema(embedding_dim: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("position", DataType::UInt32, false),
            Field::new(TEXT_COLUMN, DataType::Utf8, false),
            Field::new(
                EMBEDDING_COLUMN,
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    embedding_dim as i32,
                ),
                false,
            ),
        ]))
    }

    /// Convert chunks into one RecordBatch.
    fn chunks_to_batch(&self, chunks: &[HandbookChunk]) -> AppResult<RecordBatch> {
        let schema = Self::create_schema(self.embedding_dim);

        let mut values = Vec::with_capacity(chunks.len() * self.embedding_dim);
        for chunk in chunks {
            let embedding = chunk.embedding.as_ref().ok_or_else(|| {
                AppError::Knowledge(format!("Chunk '{}' missing embedding", chunk.id))
            })?;

            if embedding.len() != self.embedding_dim {
                return Err(AppError::Knowledge(format!(
                    "Embedding dimension mismatch for '{}': expected {}, got {}",
                    chunk.id,
                    self.embedding_dim,
                    embedding.len()
                )));
            }
            values.extend_from_slice(embedding);
        }

        let ids = StringArray::from_iter_values(chunks.iter().map(|c| c.id.as_str()));
        let positions = UInt32Array::from_iter_values(chunks.iter().map(|c| c.position));
        let texts = StringArray::from_iter_values(chunks.iter().map(|c| c.text.as_str()));

        let embeddings = FixedSizeListArray::try_new(
            Arc::new(Field::new("item", DataType::Float32, true)),
            self.embedding_dim as i32,
            Arc::new(Float32Array::from(values)),
            None,
        )
        .map_err(|e| AppError::Knowledge(format!("Failed to build embedding column: {}", e)))?;

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(ids),
                Arc::new(positions),
                Arc::new(texts),
                Arc::new(embeddings),
            ],
        )
        .map_err(|e| AppError::Knowledge(format!("Failed to create RecordBatch: {}", e)))
    }
}

#[async_trait::async_trait]
impl HandbookIndex for LanceDbIndex {
    async fn query(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<String>> {
        if query_embedding.len() != self.embedding_dim {
            return Err(AppError::Knowledge(format!(
                "Query embedding dimension mismatch: expected {}, got {}",
                self.embedding_dim,
                query_embedding.len()
            )));
        }

        let batches = self
            .table
            .query()
            .nearest_to(query_embedding.to_vec())
            .map_err(|e| AppError::Knowledge(format!("Failed to create query: {}", e)))?
            .limit(top_k)
            .execute()
            .await
            .map_err(|e| AppError::Knowledge(format!("Failed to execute search: {}", e)))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| AppError::Knowledge(format!("Failed to collect results: {}", e)))?;

        let mut texts = Vec::new();
        for batch in &batches {
            let column = batch
                .column_by_name(TEXT_COLUMN)
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| AppError::Knowledge("Invalid text column".to_string()))?;

            texts.extend((0..column.len()).map(|i| column.value(i).to_string()));
        }

        tracing::debug!("Retrieved {} chunks (requested top-{})", texts.len(), top_k);

        Ok(texts)
    }

    async fn add_chunks(&self, chunks: &[HandbookChunk]) -> AppResult<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let batch = self.chunks_to_batch(chunks)?;
        let schema = batch.schema();

        self.table
            .add(RecordBatchIterator::new(vec![Ok(batch)], schema))
            .execute()
            .await
            .map_err(|e| AppError::Knowledge(format!("Failed to add chunks: {}", e)))?;

        tracing::debug!("Inserted {} chunks into LanceDB", chunks.len());
        Ok(())
    }

    async fn count(&self) -> AppResult<usize> {
        self.table
            .count_rows(None)
            .await
            .map_err(|e| AppError::Knowledge(format!("Failed to count rows: {}", e)))
    }

    async fn reset(&self) -> AppResult<()> {
        if self.count().await? > 0 {
            self.table
                .delete("id IS NOT NULL")
                .await
                .map_err(|e| AppError::Knowledge(format!("Failed to reset index: {}", e)))?;
        }

        tracing::info!("Reset handbook collection");
        Ok(())
    }
}

async fn connect(db_path: &Path) -> AppResult<Connection> {
    let uri = db_path.to_string_lossy().to_string();
    lancedb::connect(&uri)
        .execute()
        .await
        .map_err(|e| AppError::Knowledge(format!("Failed to connect to LanceDB: {}", e)))
}

async fn table_names(conn: &Connection) -> AppResult<Vec<String>> {
    conn.table_names()
        .execute()
        .await
        .map_err(|e| AppError::Knowledge(format!("Failed to list tables: {}", e)))
}

/// Read the vector size from the table schema.
async fn embedding_dim_of(table: &Table) -> AppResult<usize> {
    let schema = table
        .schema()
        .await
        .map_err(|e| AppError::Knowledge(format!("Failed to read table schema: {}", e)))?;

    let field = schema
        .field_with_name(EMBEDDING_COLUMN)
        .map_err(|_| AppError::Knowledge("Collection has no embedding column".to_string()))?;

    match field.data_type() {
        DataType::FixedSizeList(_, size) if *size > 0 => Ok(*size as usize),
        other => Err(AppError::Knowledge(format!(
            "Unexpected embedding column type: {:?}",
            other
        ))),
    }
}

fn missing_collection(db_path: &Path, table_name: &str) -> AppError {
    AppError::Knowledge(format!(
        "Handbook collection '{}' not found at {:?}. Run `advisor ingest` first.",
        table_name, db_path
    ))
}
