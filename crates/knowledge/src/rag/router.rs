//! Question routing.

use crate::rag::context::AssistantContext;
use crate::rag::types::{RouterDecision, RouterOutput};
use advisor_core::AppResult;
use advisor_llm::{complete_structured, LlmRequest};
use advisor_prompt::build_router_prompt;

/// Classify a question and extract the subject keys it mentions.
///
/// One structured-output call, no retry. Subjects are not checked against
/// the store here; the resolver skips unknown keys.
pub async fn route(ctx: &AssistantContext, question: &str) -> AppResult<RouterDecision> {
    let prompt = build_router_prompt(&ctx.prompts, question, ctx.subject_keys())?;
    let request = LlmRequest::new(prompt, ctx.model.clone()).with_temperature(0.0);

    let output: RouterOutput = complete_structured(ctx.llm.as_ref(), request).await?;
    let decision = RouterDecision::try_from(output)?;

    tracing::info!(
        query_type = %decision.query_type,
        subjects = ?decision.subjects,
        "Routed question"
    );

    Ok(decision)
}
