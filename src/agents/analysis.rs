//! Analysis Agent
//!
//! Asks the language model to pull the key points out of gathered text.

use std::sync::Arc;

use tracing::info;

use crate::llm::LLM;
use crate::types::{AppResult, GenerationSettings, SourceMode};

pub struct AnalysisAgent {
    llm: Arc<LLM>,
    settings: GenerationSettings,
    mode: SourceMode,
}

impl AnalysisAgent {
    pub fn new(llm: Arc<LLM>, settings: GenerationSettings, mode: SourceMode) -> Self {
        Self { llm, settings, mode }
    }

    /// Key points of `info`, as generated by the model
    pub async fn analyze(&self, info: &str) -> AppResult<String> {
        info!(mode = %self.mode, info_len = info.len(), "Analyzing gathered information");
        let prompt = Self::create_analysis_prompt(self.mode, info);
        let analysis = self.llm.generate(&prompt, &self.settings).await?;
        info!(analysis_len = analysis.len(), "Analysis complete");
        Ok(analysis)
    }

    /// Dual-source text carries source labels, so the model is asked to keep the sources apart
    pub fn create_analysis_prompt(mode: SourceMode, info: &str) -> String {
        match mode {
            SourceMode::SingleSource => format!("Summarize key points from this text: \n\n{}\n\n", info),
            SourceMode::DualSource => format!("Identify key points from each source in this text:\n\n{}\n\n", info),
        }
    }
}
