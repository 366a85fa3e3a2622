//! Prompt templates for the degree program advisor.
//!
//! Loads the router and final-answer templates from YAML and renders them
//! with Handlebars.

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_answer_prompt, build_router_prompt, render_template};
pub use loader::{load_prompt_config, parse_prompt_config};
pub use types::PromptConfig;
