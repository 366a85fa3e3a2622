//! Prompt types for the advisor.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Config key holding the router template.
pub const ROUTER_PROMPT_KEY: &str = "router_prompt";

/// Config key holding the final-answer template.
pub const FINAL_PROMPT_KEY: &str = "rag_final_prompt";

/// The two templates every deployment must provide.
///
/// Templates use Handlebars syntax. The router template receives
/// `{{user_question}}` and `{{subject_keywords}}`; the final-answer template
/// receives `{{context}}` and `{{question}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub router_prompt: String,
    pub rag_final_prompt: String,
}

/// Prompt config as read from disk, before required keys are checked.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPromptConfig {
    #[serde(default)]
    pub router_prompt: Option<String>,

    #[serde(default)]
    pub rag_final_prompt: Option<String>,

    /// Extra keys are allowed and ignored
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}
