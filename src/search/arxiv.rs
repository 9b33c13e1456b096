//! arXiv Client
//!
//! Queries the arXiv Atom API for preprints whose abstracts match a topic and
//! renders them into the plain-text block the dual-source agent analyzes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{Preprint, PreprintSource, SearchError};
use crate::utils::text::collapse_whitespace;

pub const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

/// Separator line between rendered preprints
pub const PREPRINT_SEPARATOR: &str = "\n========\n";

pub struct ArxivClient {
    client: Client,
    api_url: String,
}

#[derive(Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Deserialize)]
struct AtomEntry {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    published: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
}

#[derive(Deserialize)]
struct AtomAuthor {
    name: String,
}

impl ArxivClient {
    pub fn new(client: Client) -> Self {
        Self::with_api_url(client, ARXIV_API_URL)
    }

    pub fn with_api_url(client: Client, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
        }
    }
}

#[async_trait]
impl PreprintSource for ArxivClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Preprint>, SearchError> {
        info!(query = %query, max_results, "Searching arXiv");

        let max_results = max_results.to_string();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("search_query", query),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "relevance"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::RequestFailed(format!("arXiv returned HTTP {}", status)));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Raw arXiv feed received");

        let preprints = parse_feed(&body)?;
        info!(count = preprints.len(), "arXiv search completed");
        Ok(preprints)
    }

    fn name(&self) -> &str {
        "arxiv"
    }
}

/// Parse an arXiv Atom feed. arXiv reports bad queries as a single error entry.
pub fn parse_feed(xml: &str) -> Result<Vec<Preprint>, SearchError> {
    let feed: AtomFeed = quick_xml::de::from_str(xml).map_err(|e| SearchError::ParseError(e.to_string()))?;

    let mut preprints = Vec::with_capacity(feed.entries.len());
    for entry in feed.entries {
        if entry.id.contains("/api/errors") {
            return Err(SearchError::RequestFailed(collapse_whitespace(&entry.summary)));
        }

        let published = entry.published.as_deref().and_then(|raw| {
            DateTime::parse_from_rfc3339(raw.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| warn!(value = %raw, error = %e, "Unparseable published date"))
                .ok()
        });

        preprints.push(Preprint {
            id: entry.id.trim().to_string(),
            title: collapse_whitespace(&entry.title),
            summary: entry.summary.trim().to_string(),
            authors: entry.authors.into_iter().map(|a| collapse_whitespace(&a.name)).collect(),
            published,
        });
    }

    Ok(preprints)
}

/// Abstract-field query requiring every whitespace-separated token of the topic
pub fn arxiv_query(topic: &str) -> String {
    topic
        .split_whitespace()
        .map(|token| format!("abs:{}", token))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Render preprints as `Title: ..\nAbstract: ..` blocks joined by a separator line
pub fn format_preprints(preprints: &[Preprint]) -> String {
    preprints
        .iter()
        .map(|p| format!("Title: {}\nAbstract: {}", p.title, p.summary))
        .collect::<Vec<_>>()
        .join(PREPRINT_SEPARATOR)
}
