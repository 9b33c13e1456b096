//! Wikipedia Client
//!
//! Fetches full plain-text articles through the MediaWiki Action API
//! (`prop=extracts` with `explaintext`). Redirects are followed; a
//! disambiguation page is reported as ambiguous rather than returned.
//!
//! With auto-suggest enabled, a title that has no page is retried once with
//! the best full-text search hit, so "Pyhton programming" still resolves.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{EncyclopediaSource, SearchError};

pub const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

pub struct WikipediaClient {
    client: Client,
    api_url: String,
    auto_suggest: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<QueryBody>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<Page>,
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
}

#[derive(Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<String>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

enum PageLookup {
    Found(String),
    Ambiguous(String),
    Missing,
}

impl WikipediaClient {
    pub fn new(client: Client) -> Self {
        Self::with_api_url(client, WIKIPEDIA_API_URL)
    }

    pub fn with_api_url(client: Client, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            auto_suggest: true,
        }
    }

    pub fn from_config(client: Client, config: &crate::config::SourcesConfig) -> Self {
        Self::with_api_url(client, &config.wikipedia_api_url).with_auto_suggest(config.wikipedia_auto_suggest)
    }

    pub fn with_auto_suggest(mut self, enabled: bool) -> Self {
        self.auto_suggest = enabled;
        self
    }

    async fn call(&self, params: &[(&str, &str)]) -> Result<QueryBody, SearchError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::RequestFailed(format!("Wikipedia returned HTTP {}", status)));
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(SearchError::RequestFailed(format!("{}: {}", error.code, error.info)));
        }

        body.query
            .ok_or_else(|| SearchError::ParseError("Response has no query section".to_string()))
    }

    async fn lookup(&self, title: &str) -> Result<PageLookup, SearchError> {
        let body = self
            .call(&[
                ("prop", "extracts|pageprops"),
                ("ppprop", "disambiguation"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;

        let page = match body.pages.into_iter().next() {
            Some(page) => page,
            None => return Ok(PageLookup::Missing),
        };

        if page.missing || page.invalid {
            return Ok(PageLookup::Missing);
        }

        let is_disambiguation = page
            .pageprops
            .as_ref()
            .is_some_and(|props| props.disambiguation.is_some());
        if is_disambiguation {
            return Ok(PageLookup::Ambiguous(page.title));
        }

        debug!(title = %page.title, "Wikipedia page resolved");
        Ok(PageLookup::Found(page.extract.unwrap_or_default()))
    }

    /// Best full-text search hit for a query
    async fn suggest(&self, query: &str) -> Result<Option<String>, SearchError> {
        let body = self
            .call(&[("list", "search"), ("srsearch", query), ("srlimit", "1"), ("srprop", "")])
            .await?;
        Ok(body.search.into_iter().next().map(|hit| hit.title))
    }
}

#[async_trait]
impl EncyclopediaSource for WikipediaClient {
    async fn fetch_page(&self, title: &str) -> Result<String, SearchError> {
        info!(title = %title, "Fetching Wikipedia page");

        match self.lookup(title).await? {
            PageLookup::Found(text) => return Ok(text),
            PageLookup::Ambiguous(resolved) => return Err(SearchError::Ambiguous(resolved)),
            PageLookup::Missing => {}
        }

        if self.auto_suggest {
            if let Some(suggestion) = self.suggest(title).await? {
                if suggestion != title {
                    info!(title = %title, suggestion = %suggestion, "Retrying with suggested title");
                    match self.lookup(&suggestion).await? {
                        PageLookup::Found(text) => return Ok(text),
                        PageLookup::Ambiguous(resolved) => return Err(SearchError::Ambiguous(resolved)),
                        PageLookup::Missing => {}
                    }
                }
            }
        }

        Err(SearchError::NotFound(title.to_string()))
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}
