// Test doubles for the external services the agents depend on

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::llm::{LLMAdapter, LLM};
use crate::search::{EncyclopediaSource, Preprint, PreprintSource, SearchError};
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, TokenUsage};

/// Replies with "ECHO: <prompt>" and records every request
pub struct EchoAdapter {
    pub requests: Arc<Mutex<Vec<LLMRequest>>>,
}

#[async_trait]
impl LLMAdapter for EchoAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let prompt = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
        Ok(LLMResponse {
            content: format!("ECHO: {}", prompt),
            finish_reason: "stop".to_string(),
            usage: TokenUsage::default(),
        })
    }
}

pub struct FailingAdapter;

#[async_trait]
impl LLMAdapter for FailingAdapter {
    async fn create_chat_completion(&self, _request: &LLMRequest) -> AppResult<LLMResponse> {
        Err(AppError::LLMApi("insufficient_quota".to_string()))
    }
}

pub fn echo_llm() -> (Arc<LLM>, Arc<Mutex<Vec<LLMRequest>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let llm = LLM::from_adapter(
        Box::new(EchoAdapter {
            requests: requests.clone(),
        }),
        "echo",
        "echo-model",
    );
    (Arc::new(llm), requests)
}

pub fn failing_llm() -> Arc<LLM> {
    Arc::new(LLM::from_adapter(Box::new(FailingAdapter), "failing", "none"))
}

pub struct FakeEncyclopedia {
    pub result: Result<String, String>,
    pub delay: Duration,
}

impl FakeEncyclopedia {
    pub fn page(text: impl Into<String>) -> Self {
        Self {
            result: Ok(text.into()),
            delay: Duration::ZERO,
        }
    }

    pub fn missing() -> Self {
        Self {
            result: Err("missing".to_string()),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl EncyclopediaSource for FakeEncyclopedia {
    async fn fetch_page(&self, title: &str) -> Result<String, SearchError> {
        tokio::time::sleep(self.delay).await;
        self.result
            .clone()
            .map_err(|_| SearchError::NotFound(title.to_string()))
    }

    fn name(&self) -> &str {
        "fake-encyclopedia"
    }
}

pub struct FakePreprints {
    pub preprints: Vec<Preprint>,
    pub delay: Duration,
    pub queries: Arc<Mutex<Vec<(String, usize)>>>,
}

impl FakePreprints {
    pub fn new(preprints: Vec<Preprint>) -> Self {
        Self {
            preprints,
            delay: Duration::ZERO,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl PreprintSource for FakePreprints {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Preprint>, SearchError> {
        self.queries.lock().unwrap().push((query.to_string(), max_results));
        tokio::time::sleep(self.delay).await;
        Ok(self.preprints.iter().take(max_results).cloned().collect())
    }

    fn name(&self) -> &str {
        "fake-preprints"
    }
}

pub fn preprint(title: &str, summary: &str) -> Preprint {
    Preprint {
        id: format!("http://arxiv.org/abs/{}", title.len()),
        title: title.to_string(),
        summary: summary.to_string(),
        authors: vec!["A. Author".to_string()],
        published: None,
    }
}
