//! One exchange: route, resolve, generate.

use crate::rag::context::AssistantContext;
use crate::rag::generator::generate_answer;
use crate::rag::resolver::resolve_context;
use crate::rag::router::route;
use crate::rag::types::Exchange;
use advisor_core::{AppError, AppResult};
use tracing::Instrument;

/// Answer one question.
///
/// Stages run strictly in sequence and any failure ends the exchange.
pub async fn ask(ctx: &AssistantContext, question: &str) -> AppResult<Exchange> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::Routing("Question must not be empty".to_string()));
    }

    let span = tracing::info_span!("exchange", question_len = question.len());

    async move {
        let decision = route(ctx, question).await?;
        let context = resolve_context(ctx, question, &decision).await?;
        let answer = generate_answer(ctx, &context, question).await?;

        tracing::info!("Exchange complete ({} chars of context)", context.len());

        Ok(Exchange {
            question: question.to_string(),
            decision,
            context,
            answer,
        })
    }
    .instrument(span)
    .await
}
