//! Agent System
//!
//! The research agents that gather, digest and remember topic information:
//!
//! - **Fetcher**: pulls topic text from Wikipedia (and arXiv in dual-source mode)
//! - **Analysis Agent**: extracts the key points from the gathered text
//! - **Summary Agent**: condenses the analysis into a short summary
//! - **Reply Agent**: answers questions from knowledge-base context
//! - **Research Agent**: wires the above to a knowledge base
//!
//! ## Pipeline Overview
//!
//! ```text
//!    Topic
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Fetcher   │  → Wikipedia (+ arXiv, fetched concurrently)
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Analysis   │  → Key points
//! │   Agent     │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Summary    │  → Concise summary
//! │   Agent     │
//! └─────────────┘
//!
//!  Any text ──▶ Knowledge Base ◀── Query ──▶ nearest chunk (──▶ Reply Agent)
//! ```

pub mod analysis;
pub mod fetcher;
pub mod reply;
pub mod research;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main components
pub use analysis::AnalysisAgent;
pub use fetcher::{combine_sources, Fetcher};
pub use reply::ReplyAgent;
pub use research::{AgentServices, ResearchAgent, ResearchReport};
pub use summary::SummaryAgent;
