//! Stats command handler.

use advisor_core::{config::AppConfig, AppResult};
use advisor_knowledge::knowledge_stats;
use clap::Args;

/// Show the size of the knowledge sources
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let stats = knowledge_stats(config).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        println!("Subjects:        {}", stats.subjects);
        match stats.handbook_chunks {
            Some(count) => println!("Handbook chunks: {}", count),
            None => println!("Handbook chunks: not ingested"),
        }

        Ok(())
    }
}
