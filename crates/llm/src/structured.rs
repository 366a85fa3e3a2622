//! Structured output: ask for a JSON shape, decode it locally.
//!
//! Providers are told the schema, but nothing they return is trusted until it
//! deserializes into the target type here.

use crate::client::{LlmClient, LlmRequest};
use advisor_core::{AppError, AppResult};
use serde::de::DeserializeOwned;

/// A type the reasoning service can be asked to produce.
pub trait StructuredOutput: DeserializeOwned {
    /// JSON schema describing the expected shape.
    fn schema() -> serde_json::Value;
}

/// Run a completion in structured-output mode and decode the result.
///
/// Errors with `AppError::Llm` if the call fails or the content is not a
/// JSON document of the requested shape.
pub async fn complete_structured<T: StructuredOutput>(
    client: &dyn LlmClient,
    request: LlmRequest,
) -> AppResult<T> {
    let request = request.with_format(T::schema());

    tracing::debug!(
        "Requesting structured output from provider '{}'",
        client.provider_name()
    );

    let response = client.complete(&request).await?;
    parse_structured(&response.content)
}

/// Decode a model reply into `T`.
///
/// Tolerates a Markdown code fence around the JSON, which some hosted models
/// emit even in JSON mode.
pub fn parse_structured<T: DeserializeOwned>(content: &str) -> AppResult<T> {
    let body = strip_code_fence(content.trim());

    serde_json::from_str(body).map_err(|e| {
        AppError::Llm(format!(
            "Structured output did not match the expected shape: {} (content: {})",
            e,
            truncate(body, 200)
        ))
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Skip an optional language tag on the opening fence
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
