// Scholar Agent - research assistant over Wikipedia and arXiv with a semantic knowledge base

pub mod config;
pub mod types;
pub mod agents;
pub mod llm;
pub mod search;    // Knowledge sources (Wikipedia, arXiv)
pub mod embeddings;
pub mod utils;

// Re-exports for convenience
pub use agents::{AgentServices, ResearchAgent, ResearchReport};
pub use config::Config;
pub use types::{AppError, AppResult, SourceMode};
