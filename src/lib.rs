pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod taxonomy;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{PipelineContext, ResearchRequest, execute};
