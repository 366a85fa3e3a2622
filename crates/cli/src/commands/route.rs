//! Route command handler.

use advisor_core::{config::AppConfig, AppResult};
use advisor_knowledge::{route, AssistantContext};
use clap::Args;

/// Show how a question would be routed, without answering it
#[derive(Args, Debug)]
pub struct RouteCommand {
    /// The question to classify
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RouteCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing route command");

        let ctx = AssistantContext::from_config(config).await?;
        let decision = route(&ctx, &self.question.join(" ")).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&decision)?);
        } else {
            println!("Query type: {}", decision.query_type);
            if decision.subjects.is_empty() {
                println!("Subjects:   (none)");
            } else {
                for subject in &decision.subjects {
                    let marker = if ctx.subjects.get(subject).is_some() {
                        "known"
                    } else {
                        "unknown"
                    };
                    println!("Subject:    {} ({})", subject, marker);
                }
            }
        }

        Ok(())
    }
}
