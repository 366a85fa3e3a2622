//! OpenAI-compatible chat completions provider.
//!
//! Covers OpenAI itself and hosted endpoints speaking the same protocol
//! (Groq). Structured output uses JSON mode with the schema spelled out in
//! the system message, since JSON-schema mode is not available on every model.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use advisor_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Client for any `/chat/completions` endpoint.
pub struct OpenAiClient {
    /// Provider label reported in logs ("openai", "groq")
    provider: String,

    /// Base URL including the version segment, e.g. `https://api.groq.com/openai/v1`
    base_url: String,

    api_key: String,

    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn to_chat_request(&self, request: &LlmRequest) -> ChatRequest {
        let mut messages = Vec::new();

        if let Some(ref schema) = request.format {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: format!(
                    "Respond only with a JSON object that conforms to this JSON schema:\n{}",
                    schema
                ),
            });
        }

        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });

        ChatRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            response_format: request
                .format
                .as_ref()
                .map(|_| serde_json::json!({"type": "json_object"})),
        }
    }

    fn convert_response(&self, response: ChatResponse) -> AppResult<LlmResponse> {
        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::Llm(format!("{} returned no completion choices", self.provider))
            })?;

        Ok(LlmResponse {
            content,
            model: response.model,
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        &self.provider
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::debug!(
            "Sending chat completion to {} (model: {}, structured: {})",
            self.provider,
            request.model,
            request.is_structured()
        );

        let url = format!("{}/chat/completions", self.base_url);
        let body = self.to_chat_request(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::Llm(format!("Failed to send request to {}: {}", self.provider, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "{} API error ({}): {}",
                self.provider, status, error_text
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            AppError::Llm(format!("Failed to parse {} response: {}", self.provider, e))
        })?;

        self.convert_response(chat_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiClient {
        OpenAiClient::new("groq", "https://api.groq.com/openai/v1/", "test-key")
    }

    #[test]
    fn test_base_url_normalized() {
        let client = client();
        assert_eq!(client.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(client.provider_name(), "groq");
    }

    #[test]
    fn test_plain_request_has_single_user_message() {
        let request = LlmRequest::new("What is the final exam policy?", "llama-3.1-8b-instant");
        let body = serde_json::to_value(client().to_chat_request(&request)).unwrap();

        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_structured_request_uses_json_mode() {
        let schema = serde_json::json!({"type": "object", "required": ["query_type"]});
        let request = LlmRequest::new("Classify", "llama-3.1-8b-instant").with_format(schema);
        let body = serde_json::to_value(client().to_chat_request(&request)).unwrap();

        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        let system = body["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("JSON schema"));
        assert!(system.contains("query_type"));
    }

    #[test]
    fn test_convert_response() {
        let raw: ChatResponse = serde_json::from_str(
            r#"{
                "model": "llama-3.1-8b-instant",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello"}}],
                "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
            }"#,
        )
        .unwrap();

        let response = client().convert_response(raw).unwrap();
        assert_eq!(response.content, "Hello");
        assert_eq!(response.usage.total_tokens, 4);
    }

    #[test]
    fn test_convert_response_without_choices() {
        let raw: ChatResponse =
            serde_json::from_str(r#"{"model": "m", "choices": []}"#).unwrap();
        assert!(client().convert_response(raw).is_err());
    }
}
