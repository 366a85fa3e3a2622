//! One-time ingestion of the subject files and the handbook.

use crate::chunker::chunk_text;
use crate::embeddings::{create_provider, EmbeddingProvider};
use crate::lancedb_index::LanceDbIndex;
use crate::subjects::SubjectStore;
use crate::types::{HandbookIngestStats, SubjectIngestStats};
use crate::vector_index::HandbookIndex;
use advisor_core::{AppConfig, AppError, AppResult};
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// File name of the handbook inside the data folder.
pub const HANDBOOK_FILE_NAME: &str = "handbook.txt";

/// Build the subject store from a folder of `.txt` files.
///
/// Every `*.txt` directly inside `folder`, except the handbook, becomes a
/// subject keyed by its file stem. Unreadable files are logged and skipped.
pub fn ingest_subjects(folder: &Path, output: &Path) -> AppResult<SubjectIngestStats> {
    if !folder.is_dir() {
        return Err(AppError::Knowledge(format!(
            "Data folder not found: {:?}",
            folder
        )));
    }

    let mut subjects = BTreeMap::new();
    let mut skipped = 0;

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if !is_subject_file(path) {
            continue;
        }

        let Some(key) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            continue;
        };

        match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!("Read subject '{}' ({} bytes)", key, content.len());
                subjects.insert(key, content);
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable subject file {:?}: {}", path, e);
                skipped += 1;
            }
        }
    }

    let store = SubjectStore::from_map(subjects);
    store.save(output)?;

    tracing::info!(
        "Wrote {} subjects to {:?} ({} skipped)",
        store.len(),
        output,
        skipped
    );

    Ok(SubjectIngestStats {
        subjects: store.len(),
        skipped,
        output: output.to_path_buf(),
    })
}

fn is_subject_file(path: &Path) -> bool {
    let is_txt = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false);

    let is_handbook = path
        .file_name()
        .map(|name| name.to_string_lossy().eq_ignore_ascii_case(HANDBOOK_FILE_NAME))
        .unwrap_or(false);

    is_txt && !is_handbook
}

/// Chunk, embed and index the handbook, replacing what the index held.
pub async fn ingest_handbook(
    handbook: &Path,
    index: &dyn HandbookIndex,
    embedder: &dyn EmbeddingProvider,
    chunk_size: usize,
    chunk_overlap: usize,
) -> AppResult<HandbookIngestStats> {
    let start = Instant::now();

    let text = std::fs::read_to_string(handbook).map_err(|e| {
        AppError::Knowledge(format!("Failed to read handbook {:?}: {}", handbook, e))
    })?;

    let mut chunks = chunk_text(&text, chunk_size, chunk_overlap)?;
    if chunks.is_empty() {
        return Err(AppError::Knowledge(format!(
            "Handbook {:?} contains no text",
            handbook
        )));
    }

    tracing::info!(
        "Embedding {} handbook chunks with {} ({})",
        chunks.len(),
        embedder.provider_name(),
        embedder.model_name()
    );

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    if embeddings.len() != chunks.len() {
        return Err(AppError::Knowledge(format!(
            "Embedding provider returned {} vectors for {} chunks",
            embeddings.len(),
            chunks.len()
        )));
    }

    let expected_dim = embedder.dimensions();
    if let Some(bad) = embeddings.iter().find(|e| e.len() != expected_dim) {
        return Err(AppError::Knowledge(format!(
            "Embedding provider returned a {}-dimensional vector, expected {}",
            bad.len(),
            expected_dim
        )));
    }

    for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
        chunk.embedding = Some(embedding);
    }

    index.reset().await?;
    if let Err(e) = index.add_chunks(&chunks).await {
        tracing::error!(
            "Handbook index was cleared but writing {} chunks failed; re-run ingest: {}",
            chunks.len(),
            e
        );
        return Err(e);
    }

    let stats = HandbookIngestStats {
        chunks: chunks.len(),
        characters: text.chars().count(),
        embedding_dim: embedder.dimensions(),
        ingested_at: Utc::now(),
        duration_secs: start.elapsed().as_secs_f64(),
    };

    tracing::info!(
        "Indexed {} handbook chunks in {:.2}s",
        stats.chunks,
        stats.duration_secs
    );

    Ok(stats)
}

/// Outcome of a full ingestion run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IngestReport {
    pub subjects: SubjectIngestStats,
    pub handbook: HandbookIngestStats,
}

/// Ingest both knowledge sources using the configured locations.
///
/// The handbook defaults to `handbook.txt` inside `data_dir`.
pub async fn ingest_all(
    config: &AppConfig,
    data_dir: &Path,
    handbook: Option<PathBuf>,
) -> AppResult<IngestReport> {
    // Nothing is written unless both sources are present
    let handbook_path = handbook.unwrap_or_else(|| data_dir.join(HANDBOOK_FILE_NAME));
    if !handbook_path.is_file() {
        return Err(AppError::Knowledge(format!(
            "Handbook not found: {:?}",
            handbook_path
        )));
    }

    let subjects = ingest_subjects(data_dir, &config.subjects_path())?;

    let embedder = create_provider(&config.embedding).await?;
    let index = LanceDbIndex::create_or_open(
        &config.handbook_db_path(),
        &config.knowledge.collection,
        embedder.dimensions(),
    )
    .await?;

    let handbook = ingest_handbook(
        &handbook_path,
        &index,
        embedder.as_ref(),
        config.knowledge.chunk_size,
        config.knowledge.chunk_overlap,
    )
    .await?;

    Ok(IngestReport { subjects, handbook })
}
