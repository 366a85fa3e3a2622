//! Context resolution for a routed question.

use crate::embeddings::EmbeddingProvider;
use crate::rag::context::AssistantContext;
use crate::rag::types::{QueryType, RouterDecision};
use crate::subjects::SubjectStore;
use crate::vector_index::HandbookIndex;
use advisor_core::AppResult;
use std::collections::BTreeSet;

/// Context returned when none of the routed subjects exist.
pub const SUBJECT_NOT_FOUND: &str = "Could not find the specified subject document.";

/// Number of handbook chunks requested per question.
pub const HANDBOOK_TOP_K: usize = 10;

/// Separator placed between handbook chunks.
pub const CHUNK_DELIMITER: &str = "\n\n---\n\n";

/// Assemble the context for a question according to its routing decision.
pub async fn resolve_context(
    ctx: &AssistantContext,
    question: &str,
    decision: &RouterDecision,
) -> AppResult<String> {
    match decision.query_type {
        QueryType::SubjectContent => Ok(resolve_subject_context(&ctx.subjects, &decision.subjects)),
        QueryType::GeneralHandbook => {
            resolve_handbook_context(ctx.embedder.as_ref(), ctx.index.as_ref(), question).await
        }
    }
}

/// Concatenate the documents of the named subjects.
///
/// Keys are deduplicated and visited in sorted order. Each document is
/// followed by a blank line. Unknown keys and empty documents are skipped.
pub fn resolve_subject_context(store: &SubjectStore, subjects: &[String]) -> String {
    let keys: BTreeSet<&str> = subjects.iter().map(String::as_str).collect();

    let mut context = String::new();
    for key in keys {
        match store.get(key) {
            Some(document) if !document.is_empty() => {
                tracing::debug!("Found subject '{}' ({} chars)", key, document.len());
                context.push_str(document);
                context.push_str("\n\n");
            }
            Some(_) => tracing::warn!(subject = key, "Subject document is empty, skipping"),
            None => tracing::warn!(subject = key, "Router named an unknown subject, skipping"),
        }
    }

    if context.is_empty() {
        tracing::info!("No subject documents matched, using fallback context");
        return SUBJECT_NOT_FOUND.to_string();
    }

    context
}

/// Embed the question once and join the top handbook chunks in index order.
pub async fn resolve_handbook_context(
    embedder: &dyn EmbeddingProvider,
    index: &dyn HandbookIndex,
    question: &str,
) -> AppResult<String> {
    let embedding = embedder.embed(question).await?;
    let chunks = index.query(&embedding, HANDBOOK_TOP_K).await?;

    if chunks.is_empty() {
        tracing::warn!("Handbook search returned no chunks, answering with empty context");
    } else {
        tracing::info!("Retrieved {} handbook chunks", chunks.len());
    }

    Ok(chunks.join(CHUNK_DELIMITER))
}
