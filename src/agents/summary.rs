//! Summary Agent
//!
//! Condenses an analysis into a short summary.

use std::sync::Arc;

use tracing::info;

use crate::llm::LLM;
use crate::types::{AppResult, GenerationSettings};

pub struct SummaryAgent {
    llm: Arc<LLM>,
    settings: GenerationSettings,
}

impl SummaryAgent {
    pub fn new(llm: Arc<LLM>, settings: GenerationSettings) -> Self {
        Self { llm, settings }
    }

    pub async fn summarize(&self, analysis: &str) -> AppResult<String> {
        info!(analysis_len = analysis.len(), "Generating summary");
        let summary = self
            .llm
            .generate(&Self::create_summary_prompt(analysis), &self.settings)
            .await?;
        info!(summary_len = summary.len(), "Summary complete");
        Ok(summary)
    }

    pub fn create_summary_prompt(analysis: &str) -> String {
        format!("Based on the following analysis, generate a concise summary: \n\n{}", analysis)
    }
}
