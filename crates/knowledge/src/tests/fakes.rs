//! Test doubles for the external services.

use crate::embeddings::EmbeddingProvider;
use crate::rag::AssistantContext;
use crate::subjects::SubjectStore;
use crate::types::HandbookChunk;
use crate::vector_index::HandbookIndex;
use advisor_core::{AppError, AppResult};
use advisor_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use advisor_prompt::PromptConfig;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// LLM client that replays scripted replies and records every request.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<AppResult<String>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a failing reply.
    pub fn then_fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(AppError::Llm(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Llm("No scripted reply left".to_string())))?;

        Ok(LlmResponse {
            content: reply,
            model: request.model.clone(),
            usage: LlmUsage::new(10, 5),
        })
    }
}

/// Handbook index with fixed query results that records its calls.
#[derive(Default)]
pub struct RecordingIndex {
    results: Vec<String>,
    fail_queries: bool,
    fail_adds: bool,
    queries: Mutex<Vec<(Vec<f32>, usize)>>,
    stored: Mutex<Vec<HandbookChunk>>,
    resets: AtomicUsize,
}

impl RecordingIndex {
    pub fn with_results(results: Vec<String>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_queries: true,
            ..Default::default()
        }
    }

    /// Accepts resets but rejects every write.
    pub fn failing_adds() -> Self {
        Self {
            fail_adds: true,
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<(Vec<f32>, usize)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn stored_chunks(&self) -> Vec<HandbookChunk> {
        self.stored.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HandbookIndex for RecordingIndex {
    async fn query(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<String>> {
        self.queries
            .lock()
            .unwrap()
            .push((query_embedding.to_vec(), top_k));

        if self.fail_queries {
            return Err(AppError::Knowledge("index unavailable".to_string()));
        }

        Ok(self.results.iter().take(top_k).cloned().collect())
    }

    async fn add_chunks(&self, chunks: &[HandbookChunk]) -> AppResult<()> {
        if self.fail_adds {
            return Err(AppError::Knowledge("disk full".to_string()));
        }
        self.stored.lock().unwrap().extend_from_slice(chunks);
        Ok(())
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.stored.lock().unwrap().len())
    }

    async fn reset(&self) -> AppResult<()> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        self.stored.lock().unwrap().clear();
        Ok(())
    }
}

/// Embedding provider that counts calls and returns a constant vector.
#[derive(Debug, Default)]
pub struct CountingEmbedder {
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
    declared_dimensions: Option<usize>,
}

impl CountingEmbedder {
    pub const VECTOR: [f32; 3] = [0.25, 0.5, 0.75];

    /// Claim a dimension that the returned vectors do not have.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            declared_dimensions: Some(dimensions),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for CountingEmbedder {
    fn provider_name(&self) -> &str {
        "counting"
    }

    fn model_name(&self) -> &str {
        "constant"
    }

    fn dimensions(&self) -> usize {
        self.declared_dimensions.unwrap_or(Self::VECTOR.len())
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().extend_from_slice(texts);
        Ok(texts.iter().map(|_| Self::VECTOR.to_vec()).collect())
    }
}

pub fn prompts() -> PromptConfig {
    PromptConfig {
        router_prompt: "Subjects: {{subject_keywords}}\nQuestion: {{user_question}}".to_string(),
        rag_final_prompt: "CONTEXT<<{{context}}>>\nQUESTION<<{{question}}>>".to_string(),
    }
}

pub fn store(entries: &[(&str, &str)]) -> SubjectStore {
    SubjectStore::from_map(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
    )
}

/// A context wired to fakes, with handles kept for assertions.
pub struct Harness {
    pub ctx: AssistantContext,
    pub llm: Arc<ScriptedLlm>,
    pub index: Arc<RecordingIndex>,
    pub embedder: Arc<CountingEmbedder>,
}

pub fn harness(subjects: SubjectStore, index: RecordingIndex, llm: ScriptedLlm) -> Harness {
    let llm = Arc::new(llm);
    let index = Arc::new(index);
    let embedder = Arc::new(CountingEmbedder::default());

    let ctx = AssistantContext::new(
        subjects,
        prompts(),
        index.clone(),
        embedder.clone(),
        llm.clone(),
        "test-model",
    );

    Harness {
        ctx,
        llm,
        index,
        embedder,
    }
}
