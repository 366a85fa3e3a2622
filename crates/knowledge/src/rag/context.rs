//! Shared, read-only state for answering questions.

use crate::embeddings::{create_provider, EmbeddingProvider};
use crate::lancedb_index::LanceDbIndex;
use crate::subjects::SubjectStore;
use crate::vector_index::HandbookIndex;
use advisor_core::{AppConfig, AppError, AppResult};
use advisor_llm::{create_client, LlmClient};
use advisor_prompt::{load_prompt_config, PromptConfig};
use std::sync::Arc;

/// Everything an exchange reads: both knowledge sources, the templates and
/// the service clients.
///
/// Built once at startup and shared by reference (or `Arc`) afterwards.
pub struct AssistantContext {
    pub subjects: SubjectStore,
    pub prompts: PromptConfig,
    pub index: Arc<dyn HandbookIndex>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub llm: Arc<dyn LlmClient>,

    /// Model name passed with every reasoning request
    pub model: String,

    /// Subject keys as shown to the router, sorted
    subject_keys: Vec<String>,
}

impl AssistantContext {
    pub fn new(
        subjects: SubjectStore,
        prompts: PromptConfig,
        index: Arc<dyn HandbookIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
    ) -> Self {
        let subject_keys = subjects.keys();
        Self {
            subjects,
            prompts,
            index,
            embedder,
            llm,
            model: model.into(),
            subject_keys,
        }
    }

    /// Build the context from configuration.
    ///
    /// Fails if the subject store or prompt file is missing or malformed,
    /// the provider is unknown, the embedding service is unreachable, or
    /// the handbook collection has not been ingested.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let subjects = SubjectStore::load(&config.subjects_path())?;
        let prompts = load_prompt_config(&config.prompts_path())?;

        let endpoint = config.resolve_endpoint(&config.provider);
        let api_key = config.resolve_api_key(&config.provider);
        let llm = create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())
            .map_err(AppError::Config)?;

        let embedder = create_provider(&config.embedding).await?;

        let index =
            LanceDbIndex::open(&config.handbook_db_path(), &config.knowledge.collection).await?;

        if index.embedding_dim() != embedder.dimensions() {
            return Err(AppError::Knowledge(format!(
                "Handbook collection stores {}-dimensional embeddings but '{}' produces {}. Re-run `advisor ingest`.",
                index.embedding_dim(),
                embedder.model_name(),
                embedder.dimensions()
            )));
        }

        tracing::info!(
            "Assistant ready: {} subjects, provider '{}' (model: {}), embeddings '{}'",
            subjects.len(),
            llm.provider_name(),
            config.model,
            embedder.model_name()
        );

        Ok(Self::new(
            subjects,
            prompts,
            Arc::new(index),
            embedder,
            llm,
            config.model.clone(),
        ))
    }

    pub fn subject_keys(&self) -> &[String] {
        &self.subject_keys
    }
}
