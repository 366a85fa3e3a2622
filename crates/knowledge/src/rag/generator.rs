//! Final answer generation.

use crate::rag::context::AssistantContext;
use advisor_core::AppResult;
use advisor_llm::LlmRequest;
use advisor_prompt::build_answer_prompt;

/// Fill the final-answer template and return the model's reply verbatim.
pub async fn generate_answer(
    ctx: &AssistantContext,
    context: &str,
    question: &str,
) -> AppResult<String> {
    let prompt = build_answer_prompt(&ctx.prompts, context, question)?;
    let request = LlmRequest::new(prompt, ctx.model.clone());

    tracing::debug!("Generating answer with provider '{}'", ctx.llm.provider_name());

    let response = ctx.llm.complete(&request).await?;

    tracing::debug!(
        "Answer generated ({} chars, {} tokens)",
        response.content.len(),
        response.usage.total_tokens
    );

    Ok(response.content)
}
