//! Loader for the prompt template file.

use crate::builder::check_template;
use crate::types::{PromptConfig, RawPromptConfig, FINAL_PROMPT_KEY, ROUTER_PROMPT_KEY};
use advisor_core::{AppError, AppResult};
use std::path::Path;

const ROUTER_PLACEHOLDERS: &[&str] = &["user_question", "subject_keywords"];
const FINAL_PLACEHOLDERS: &[&str] = &["context", "question"];

/// Load and validate the prompt templates.
///
/// The file must be a YAML mapping with both `router_prompt` and
/// `rag_final_prompt`. A missing file, malformed YAML, a missing or empty
/// key, or a template that does not compile is an error. Missing
/// placeholders are only logged.
///
/// # Example
/// ```no_run
/// use advisor_prompt::load_prompt_config;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompts = load_prompt_config(Path::new("config/rag_prompts.yaml"))?;
/// println!("Router template: {} chars", prompts.router_prompt.len());
/// # Ok(())
/// # }
/// ```
pub fn load_prompt_config(path: &Path) -> AppResult<PromptConfig> {
    tracing::debug!("Loading prompt config from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt config not found: {:?}",
            path
        )));
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::Prompt(format!("Failed to read prompt config {:?}: {}", path, e)))?;

    let config = parse_prompt_config(&contents)
        .map_err(|e| AppError::Prompt(format!("Invalid prompt config {:?}: {}", path, e)))?;

    tracing::info!("Loaded prompt config from {:?}", path);

    Ok(config)
}

/// Parse and validate prompt templates from YAML text.
pub fn parse_prompt_config(contents: &str) -> AppResult<PromptConfig> {
    let raw: RawPromptConfig = serde_yaml::from_str(contents)
        .map_err(|e| AppError::Prompt(format!("malformed YAML: {}", e)))?;

    if !raw.extra.is_empty() {
        tracing::debug!("Ignoring {} extra prompt keys", raw.extra.len());
    }

    let router_prompt = required(raw.router_prompt, ROUTER_PROMPT_KEY)?;
    let rag_final_prompt = required(raw.rag_final_prompt, FINAL_PROMPT_KEY)?;

    check_template(ROUTER_PROMPT_KEY, &router_prompt)?;
    check_template(FINAL_PROMPT_KEY, &rag_final_prompt)?;

    warn_missing_placeholders(ROUTER_PROMPT_KEY, &router_prompt, ROUTER_PLACEHOLDERS);
    warn_missing_placeholders(FINAL_PROMPT_KEY, &rag_final_prompt, FINAL_PLACEHOLDERS);

    Ok(PromptConfig {
        router_prompt,
        rag_final_prompt,
    })
}

fn required(value: Option<String>, key: &str) -> AppResult<String> {
    match value {
        Some(template) if !template.trim().is_empty() => Ok(template),
        Some(_) => Err(AppError::Prompt(format!("key '{}' is empty", key))),
        None => Err(AppError::Prompt(format!("missing required key '{}'", key))),
    }
}

fn warn_missing_placeholders(key: &str, template: &str, placeholders: &[&str]) {
    for placeholder in placeholders {
        if !template.contains(placeholder) {
            tracing::warn!(
                "Template '{}' does not reference '{{{{{}}}}}'",
                key,
                placeholder
            );
        }
    }
}
