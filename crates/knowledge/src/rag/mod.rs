//! Question answering over the subject store and the handbook.
//!
//! Each question goes through the router, the context resolver and the
//! answer generator, in that order.

pub mod context;
pub mod generator;
pub mod pipeline;
pub mod resolver;
pub mod router;
pub mod types;

pub use context::AssistantContext;
pub use pipeline::ask;
pub use resolver::{resolve_context, CHUNK_DELIMITER, HANDBOOK_TOP_K, SUBJECT_NOT_FOUND};
pub use router::route;
pub use types::{Exchange, QueryType, RouterDecision, RouterOutput};
