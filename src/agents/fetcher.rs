//! Fetcher
//!
//! Gathers raw topic text from the knowledge sources, cut to the configured
//! character budget. The dual-source gather issues the encyclopedia fetch and
//! the preprint search concurrently on the current task and waits for both;
//! the combined text always lists Wikipedia first, then arXiv.

use std::sync::Arc;

use tracing::info;

use crate::search::{arxiv_query, format_preprints, EncyclopediaSource, PreprintSource};
use crate::types::{AppError, AppResult};
use crate::utils::text::truncate_chars;

pub struct Fetcher {
    encyclopedia: Arc<dyn EncyclopediaSource>,
    preprints: Option<Arc<dyn PreprintSource>>,
    max_info_chars: usize,
    max_preprints: usize,
}

impl Fetcher {
    pub fn new(encyclopedia: Arc<dyn EncyclopediaSource>, max_info_chars: usize) -> Self {
        Self {
            encyclopedia,
            preprints: None,
            max_info_chars,
            max_preprints: 5,
        }
    }

    pub fn with_preprints(mut self, preprints: Arc<dyn PreprintSource>, max_preprints: usize) -> Self {
        self.preprints = Some(preprints);
        self.max_preprints = max_preprints;
        self
    }

    pub fn max_info_chars(&self) -> usize {
        self.max_info_chars
    }

    /// Encyclopedia article for the topic, cut to `max_info_chars` characters
    pub async fn gather_wikipedia(&self, topic: &str) -> AppResult<String> {
        let content = self.encyclopedia.fetch_page(topic).await?;
        info!(
            source = self.encyclopedia.name(),
            chars = content.chars().count(),
            "Encyclopedia article fetched"
        );
        Ok(truncate_chars(&content, self.max_info_chars).to_string())
    }

    /// Top preprint abstracts for the topic, rendered and cut to `max_info_chars` characters
    pub async fn gather_arxiv(&self, topic: &str) -> AppResult<String> {
        let source = self
            .preprints
            .as_ref()
            .ok_or_else(|| AppError::Config("No preprint source configured".to_string()))?;

        let preprints = source.search(&arxiv_query(topic), self.max_preprints).await?;
        info!(source = source.name(), count = preprints.len(), "Preprints fetched");

        let info = format_preprints(&preprints);
        Ok(truncate_chars(&info, self.max_info_chars).to_string())
    }

    pub async fn fetch_single(&self, topic: &str) -> AppResult<String> {
        self.gather_wikipedia(topic).await
    }

    /// Both sources, fetched concurrently. A failure in either surfaces only
    /// after both calls have finished.
    pub async fn fetch_dual(&self, topic: &str) -> AppResult<String> {
        let (wiki, arxiv) = tokio::join!(self.gather_wikipedia(topic), self.gather_arxiv(topic));
        Ok(combine_sources(&wiki?, &arxiv?, self.max_info_chars))
    }
}

/// Label and join both sources. Each side is cut to `max_info_chars` only
/// when both are non-empty; otherwise they are joined as given.
pub fn combine_sources(wiki: &str, arxiv: &str, max_info_chars: usize) -> String {
    if !wiki.is_empty() && !arxiv.is_empty() {
        format!(
            "Wikipedia:\n{}\nArxiv:\n{}",
            truncate_chars(wiki, max_info_chars),
            truncate_chars(arxiv, max_info_chars)
        )
    } else {
        format!("Wikipedia:\n{}\nArxiv:\n{}", wiki, arxiv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::{preprint, FakeEncyclopedia, FakePreprints};
    use std::time::Duration;

    fn fetcher(wiki: FakeEncyclopedia, preprints: FakePreprints, max: usize) -> Fetcher {
        Fetcher::new(Arc::new(wiki), max).with_preprints(Arc::new(preprints), 5)
    }

    #[tokio::test]
    async fn test_fetch_single_truncates_to_budget() {
        let article = "P".repeat(5000);
        let f = Fetcher::new(Arc::new(FakeEncyclopedia::page(article)), 2000);
        let text = f.fetch_single("Python (programming language)").await.unwrap();
        assert_eq!(text.chars().count(), 2000);
    }

    #[tokio::test]
    async fn test_fetch_single_short_article_is_whole() {
        let f = Fetcher::new(Arc::new(FakeEncyclopedia::page("Short article.")), 2000);
        assert_eq!(f.fetch_single("Short").await.unwrap(), "Short article.");
    }

    #[tokio::test]
    async fn test_fetch_single_propagates_lookup_error() {
        let f = Fetcher::new(Arc::new(FakeEncyclopedia::missing()), 2000);
        let err = f.fetch_single("Nothing").await.unwrap_err();
        assert!(matches!(err, AppError::Lookup(msg) if msg.contains("Nothing")));
    }

    #[tokio::test]
    async fn test_fetch_dual_labels_and_truncates() {
        let wiki = "W".repeat(3000);
        let papers = vec![preprint("Deep Thing", &"a".repeat(3000))];
        let f = fetcher(FakeEncyclopedia::page(wiki.clone()), FakePreprints::new(papers.clone()), 2000);

        let text = f.fetch_dual("deep thing").await.unwrap();

        let arxiv = format_preprints(&papers);
        let expected = format!(
            "Wikipedia:\n{}\nArxiv:\n{}",
            &wiki[..2000],
            arxiv.chars().take(2000).collect::<String>()
        );
        assert_eq!(text, expected);
    }

    #[tokio::test]
    async fn test_fetch_dual_order_is_fixed_regardless_of_completion() {
        let wiki = FakeEncyclopedia::page("slow encyclopedia").delayed(Duration::from_millis(50));
        let papers = FakePreprints::new(vec![preprint("Fast", "abstract")]);
        let f = fetcher(wiki, papers, 2000);

        let text = f.fetch_dual("topic").await.unwrap();
        assert_eq!(
            text,
            "Wikipedia:\nslow encyclopedia\nArxiv:\nTitle: Fast\nAbstract: abstract"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_dual_runs_sources_concurrently() {
        let wiki = FakeEncyclopedia::page("w").delayed(Duration::from_secs(10));
        let papers = FakePreprints::new(vec![preprint("t", "a")]).delayed(Duration::from_secs(10));
        let f = fetcher(wiki, papers, 2000);

        let started = tokio::time::Instant::now();
        f.fetch_dual("topic").await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_fetch_dual_builds_abstract_query() {
        let papers = FakePreprints::new(vec![]);
        let queries = papers.queries.clone();
        let f = fetcher(FakeEncyclopedia::page("w"), papers, 2000);

        f.fetch_dual("quantum error correction").await.unwrap();

        let queries = queries.lock().unwrap();
        assert_eq!(
            queries[0],
            ("abs:quantum AND abs:error AND abs:correction".to_string(), 5)
        );
    }

    #[tokio::test]
    async fn test_fetch_dual_with_no_preprints() {
        let f = fetcher(FakeEncyclopedia::page("article"), FakePreprints::new(vec![]), 2000);
        assert_eq!(f.fetch_dual("topic").await.unwrap(), "Wikipedia:\narticle\nArxiv:\n");
    }

    #[tokio::test]
    async fn test_fetch_dual_fails_when_encyclopedia_fails() {
        let papers = FakePreprints::new(vec![preprint("t", "a")]);
        let queries = papers.queries.clone();
        let f = fetcher(FakeEncyclopedia::missing(), papers, 2000);

        let err = f.fetch_dual("topic").await.unwrap_err();
        assert!(matches!(err, AppError::Lookup(_)));
        // The preprint search still ran to completion
        assert_eq!(queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_dual_requires_preprint_source() {
        let f = Fetcher::new(Arc::new(FakeEncyclopedia::page("w")), 2000);
        assert!(matches!(f.fetch_dual("topic").await, Err(AppError::Config(_))));
    }

    #[test]
    fn test_combine_truncates_only_when_both_present() {
        assert_eq!(combine_sources("abcdef", "uvwxyz", 3), "Wikipedia:\nabc\nArxiv:\nuvw");
        assert_eq!(combine_sources("abcdef", "", 3), "Wikipedia:\nabcdef\nArxiv:\n");
        assert_eq!(combine_sources("", "uvwxyz", 3), "Wikipedia:\n\nArxiv:\nuvwxyz");
    }
}
