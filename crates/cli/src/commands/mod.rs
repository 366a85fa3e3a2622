//! Command handlers for the advisor CLI.

pub mod ask;
pub mod chat;
pub mod ingest;
pub mod route;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use ingest::IngestCommand;
pub use route::RouteCommand;
pub use stats::StatsCommand;
