//! Ingest command handler.

use advisor_core::{config::AppConfig, AppResult};
use advisor_knowledge::ingest_all;
use clap::Args;
use std::path::PathBuf;

/// Build the subject store and handbook index from a data folder
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Folder with one `.txt` file per subject plus `handbook.txt`
    #[arg(short, long, default_value = "Data")]
    pub data: PathBuf,

    /// Handbook file (default: <data>/handbook.txt)
    #[arg(long)]
    pub handbook: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command");

        let data_dir = config.resolve_path(&self.data);
        let handbook = self.handbook.as_deref().map(|p| config.resolve_path(p));

        let report = ingest_all(config, &data_dir, handbook).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!(
                "Subjects: {} written to {}",
                report.subjects.subjects,
                report.subjects.output.display()
            );
            if report.subjects.skipped > 0 {
                println!("          {} unreadable files skipped", report.subjects.skipped);
            }
            println!(
                "Handbook: {} chunks ({} dims) in {:.2}s",
                report.handbook.chunks, report.handbook.embedding_dim, report.handbook.duration_secs
            );
        }

        Ok(())
    }
}
