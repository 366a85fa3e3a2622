//! Ask command handler.

use advisor_core::{config::AppConfig, AppResult};
use advisor_knowledge::{ask, AssistantContext, Exchange};
use clap::Args;

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Output the whole exchange as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the routing decision and retrieved context before the answer
    #[arg(long)]
    pub show_context: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let ctx = AssistantContext::from_config(config).await?;
        let exchange = ask(&ctx, &self.question.join(" ")).await?;

        print_exchange(&exchange, self.json, self.show_context)
    }
}

/// Print an exchange to stdout.
pub fn print_exchange(exchange: &Exchange, json: bool, show_context: bool) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(exchange)?);
        return Ok(());
    }

    if show_context {
        println!(
            "[route] {} {:?}",
            exchange.decision.query_type, exchange.decision.subjects
        );
        println!("[context]\n{}\n[/context]\n", exchange.context);
    }

    println!("{}", exchange.answer);
    Ok(())
}
