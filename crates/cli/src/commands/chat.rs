//! Interactive chat loop.

use super::ask::print_exchange;
use advisor_core::{config::AppConfig, AppResult};
use advisor_knowledge::{ask, AssistantContext};
use clap::Args;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive question loop (type `exit` or `quit` to leave)
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Print the routing decision and retrieved context with each answer
    #[arg(long)]
    pub show_context: bool,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let ctx = AssistantContext::from_config(config).await?;

        println!("Degree program advisor. Ask a question, or type 'exit' to quit.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("\nYou: ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if is_exit(question) {
                break;
            }

            match ask(&ctx, question).await {
                Ok(exchange) => {
                    print!("\nAdvisor: ");
                    print_exchange(&exchange, false, self.show_context)?;
                }
                Err(e) => {
                    tracing::error!("Exchange failed: {}", e);
                    eprintln!("Error: {}", e);
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }
}

fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}
