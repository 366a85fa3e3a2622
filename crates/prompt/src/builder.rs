//! Prompt builder for rendering the router and answer templates.

use crate::types::{PromptConfig, FINAL_PROMPT_KEY, ROUTER_PROMPT_KEY};
use advisor_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build the router prompt for one question.
///
/// `subject_keys` is rendered as a JSON array so the model sees the exact
/// vocabulary it is allowed to pick from.
///
/// # Example
/// ```no_run
/// use advisor_prompt::{build_router_prompt, PromptConfig};
///
/// # fn example(config: PromptConfig) -> Result<(), Box<dyn std::error::Error>> {
/// let keys = vec!["stats101".to_string(), "cs101".to_string()];
/// let prompt = build_router_prompt(&config, "What is in stats101?", &keys)?;
/// println!("{}", prompt);
/// # Ok(())
/// # }
/// ```
pub fn build_router_prompt(
    config: &PromptConfig,
    question: &str,
    subject_keys: &[String],
) -> AppResult<String> {
    tracing::debug!(
        "Building router prompt ({} known subjects)",
        subject_keys.len()
    );

    let keywords = serde_json::to_string(subject_keys)?;

    let mut variables = HashMap::new();
    variables.insert("user_question".to_string(), question.to_string());
    variables.insert("subject_keywords".to_string(), keywords);

    render_template(ROUTER_PROMPT_KEY, &config.router_prompt, &variables)
}

/// Build the final-answer prompt from resolved context and the question.
pub fn build_answer_prompt(
    config: &PromptConfig,
    context: &str,
    question: &str,
) -> AppResult<String> {
    tracing::debug!("Building answer prompt ({} chars of context)", context.len());

    let mut variables = HashMap::new();
    variables.insert("context".to_string(), context.to_string());
    variables.insert("question".to_string(), question.to_string());

    render_template(FINAL_PROMPT_KEY, &config.rag_final_prompt, &variables)
}

/// Render a Handlebars template with variables.
///
/// HTML escaping is disabled; the output is plain prompt text.
pub fn render_template(
    name: &str,
    template: &str,
    variables: &HashMap<String, String>,
) -> AppResult<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string(name, template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template '{}': {}", name, e)))?;

    handlebars
        .render(name, variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template '{}': {}", name, e)))
}

/// Check that a template compiles without rendering it.
pub fn check_template(name: &str, template: &str) -> AppResult<()> {
    handlebars::Template::compile(template)
        .map(|_| ())
        .map_err(|e| AppError::Prompt(format!("Template '{}' does not compile: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PromptConfig {
        PromptConfig {
            router_prompt: "Known subjects: {{subject_keywords}}\nQuestion: {{user_question}}"
                .to_string(),
            rag_final_prompt: "Context:\n{{context}}\n\nQuestion: {{question}}".to_string(),
        }
    }

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "Hello, world!".to_string());

        let result = render_template("t", "Question: {{question}}", &vars);
        assert_eq!(result.unwrap(), "Question: Hello, world!");
    }

    #[test]
    fn test_render_does_not_escape() {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), "a < b && \"quoted\"".to_string());

        let result = render_template("t", "{{context}}", &vars).unwrap();
        assert_eq!(result, "a < b && \"quoted\"");
    }

    #[test]
    fn test_router_prompt_lists_keys_as_json() {
        let keys = vec!["cs101".to_string(), "stats101".to_string()];
        let prompt = build_router_prompt(&config(), "Tell me about stats101", &keys).unwrap();

        assert!(prompt.contains(r#"["cs101","stats101"]"#));
        assert!(prompt.contains("Question: Tell me about stats101"));
    }

    #[test]
    fn test_router_prompt_with_no_keys() {
        let prompt = build_router_prompt(&config(), "Anything?", &[]).unwrap();
        assert!(prompt.contains("Known subjects: []"));
    }

    #[test]
    fn test_answer_prompt_keeps_context_verbatim() {
        let context = "chunk A\n\n---\n\nchunk B";
        let prompt = build_answer_prompt(&config(), context, "What is the policy?").unwrap();

        assert_eq!(
            prompt,
            "Context:\nchunk A\n\n---\n\nchunk B\n\nQuestion: What is the policy?"
        );
    }

    #[test]
    fn test_check_template() {
        assert!(check_template("ok", "Hello {{name}}").is_ok());
        assert!(check_template("bad", "Hello {{#if}}").is_err());
    }
}
