//! Search Module
//!
//! Knowledge sources the research agents gather topic text from:
//! - Wikipedia (encyclopedia) - full plain-text article for a title
//! - arXiv (preprint index) - abstracts of the most relevant preprints
//!
//! Both sit behind small traits so the agents can be driven by any source
//! with the same request/response contract.

pub mod arxiv;
pub mod wikipedia;

pub use arxiv::{arxiv_query, format_preprints, ArxivClient};
pub use wikipedia::WikipediaClient;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::AppError;

/// Errors that can occur while querying a knowledge source
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No page found for \"{0}\"")]
    NotFound(String),

    #[error("\"{0}\" is ambiguous and refers to several pages")]
    Ambiguous(String),

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        AppError::Lookup(err.to_string())
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::RequestFailed(err.to_string())
    }
}

/// A preprint returned by a preprint search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprint {
    /// Abstract page URL, e.g. http://arxiv.org/abs/1706.03762v7
    pub id: String,
    pub title: String,
    /// The abstract
    pub summary: String,
    pub authors: Vec<String>,
    pub published: Option<DateTime<Utc>>,
}

/// Encyclopedia service: full article text by title
#[async_trait]
pub trait EncyclopediaSource: Send + Sync {
    /// Fails with `NotFound` or `Ambiguous` when the title has no single article
    async fn fetch_page(&self, title: &str) -> Result<String, SearchError>;

    fn name(&self) -> &str;
}

/// Preprint search service, results ordered by relevance
#[async_trait]
pub trait PreprintSource: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Preprint>, SearchError>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_becomes_lookup() {
        let err: AppError = SearchError::Ambiguous("Mercury".to_string()).into();
        match err {
            AppError::Lookup(msg) => assert!(msg.contains("Mercury")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
