//! Degree program advisor CLI
//!
//! Main entry point for the `advisor` command-line tool: answers questions
//! about a degree program from its subject documents and handbook.

mod commands;

use advisor_core::{config::AppConfig, logging, AppResult};
use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, IngestCommand, RouteCommand, StatsCommand};
use std::path::PathBuf;
use tracing::Instrument;

/// Degree program advisor - grounded answers from subject documents and the handbook
#[derive(Parser, Debug)]
#[command(name = "advisor")]
#[command(about = "Answer degree program questions from subject documents and the handbook", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "ADVISOR_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file (default: <workspace>/.advisor/config.yaml)
    #[arg(short, long, global = true, env = "ADVISOR_CONFIG")]
    config: Option<PathBuf>,

    /// Log level or filter directive (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output (any non-empty NO_COLOR value counts)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// LLM provider (ollama, groq, openai)
    #[arg(short, long, global = true, env = "ADVISOR_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "ADVISOR_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question
    Ask(AskCommand),

    /// Interactive question loop
    Chat(ChatCommand),

    /// Show how a question would be routed
    Route(RouteCommand),

    /// Build the subject store and handbook index from a data folder
    Ingest(IngestCommand),

    /// Show the size of the knowledge sources
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // API keys may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.workspace, cli.config)?.with_overrides(
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(
        config.log_level.as_deref(),
        config.log_format,
        config.no_color,
    )?;

    tracing::info!("Advisor CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Route(_) => "route",
        Commands::Ingest(_) => "ingest",
        Commands::Stats(_) => "stats",
    };
    let span = tracing::info_span!("command", name = command_name);

    async move {
        let result = match cli.command {
            Commands::Ask(cmd) => cmd.execute(&config).await,
            Commands::Chat(cmd) => cmd.execute(&config).await,
            Commands::Route(cmd) => cmd.execute(&config).await,
            Commands::Ingest(cmd) => cmd.execute(&config).await,
            Commands::Stats(cmd) => cmd.execute(&config).await,
        };

        match &result {
            Ok(_) => tracing::info!("Command completed successfully"),
            Err(e) => tracing::error!("Command failed: {}", e),
        }

        result
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_env_accepts_conventional_values() {
        // Only test in this binary that touches NO_COLOR
        std::env::set_var("NO_COLOR", "1");
        let cli = Cli::try_parse_from(["advisor", "stats"]).unwrap();
        assert!(cli.no_color);

        std::env::set_var("NO_COLOR", "");
        let cli = Cli::try_parse_from(["advisor", "stats"]).unwrap();
        assert!(!cli.no_color);

        std::env::remove_var("NO_COLOR");
        let cli = Cli::try_parse_from(["advisor", "--no-color", "stats"]).unwrap();
        assert!(cli.no_color);
    }
}
