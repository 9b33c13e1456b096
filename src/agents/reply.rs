//! Reply Agent
//!
//! Answers a question from a retrieved knowledge-base chunk. The question and
//! the chunk are both fenced with `***` in the prompt.

use std::sync::Arc;

use tracing::info;

use crate::llm::LLM;
use crate::types::{AppResult, GenerationSettings};

pub struct ReplyAgent {
    llm: Arc<LLM>,
    settings: GenerationSettings,
}

impl ReplyAgent {
    pub fn new(llm: Arc<LLM>, settings: GenerationSettings) -> Self {
        Self { llm, settings }
    }

    pub async fn answer(&self, question: &str, information: &str) -> AppResult<String> {
        info!(
            question_len = question.len(),
            context_len = information.len(),
            "Answering from knowledge base"
        );
        let prompt = Self::create_answer_prompt(question, information);
        self.llm.generate(&prompt, &self.settings).await
    }

    pub fn create_answer_prompt(question: &str, information: &str) -> String {
        format!(
            "Please, answer the following question with the given information:\nQuestion:\n***{}***\nInformation:\n***{}***",
            question, information
        )
    }
}
