//! Research Agent
//!
//! Owns one fetcher, the prompt agents and a knowledge base, and exposes the
//! two pipelines: gather → analyze → summarize per topic, and enrich/query on
//! the knowledge base at any time.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AnalysisAgent, Fetcher, ReplyAgent, SummaryAgent};
use crate::config::{AgentConfig, Config};
use crate::embeddings::{EmbeddingProvider, KnowledgeBase, OpenAIEmbedding, TextChunker};
use crate::llm::{LLMProviderConfig, LLM};
use crate::search::{ArxivClient, EncyclopediaSource, PreprintSource, WikipediaClient};
use crate::types::{AppError, AppResult, SourceMode};
use crate::utils::http::build_http_client;

/// External services a research agent talks to
pub struct AgentServices {
    pub llm: Arc<LLM>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub encyclopedia: Arc<dyn EncyclopediaSource>,
    /// Required in dual-source mode
    pub preprints: Option<Arc<dyn PreprintSource>>,
    /// Preprints requested per topic
    pub max_preprints: usize,
}

impl AgentServices {
    /// OpenAI-compatible LLM and embeddings, Wikipedia and arXiv, all sharing one HTTP client
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = build_http_client(config.sources.http_timeout())?;

        let llm = LLM::new(LLMProviderConfig::from_config(config, Some(client.clone()))?)?;

        if config.llm.openai_api_key.is_empty() {
            return Err(AppError::Config("OPENAI_API_KEY is required for embeddings".to_string()));
        }
        let mut embedder = OpenAIEmbedding::new(
            client.clone(),
            &config.llm.openai_api_key,
            Some(config.llm.embedding_model.as_str()),
        );
        if let Some(base) = &config.llm.openai_api_base {
            embedder = embedder.with_api_base(base);
        }

        Ok(Self {
            llm: Arc::new(llm),
            embedder: Arc::new(embedder),
            encyclopedia: Arc::new(WikipediaClient::from_config(client.clone(), &config.sources)),
            preprints: Some(Arc::new(ArxivClient::with_api_url(client, &config.sources.arxiv_api_url))),
            max_preprints: config.sources.arxiv_max_results,
        })
    }
}

/// Output of one gather → analyze → summarize run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    pub topic: String,
    pub mode: SourceMode,
    pub gathered: String,
    pub analysis: String,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

pub struct ResearchAgent {
    mode: SourceMode,
    fetcher: Fetcher,
    analysis: AnalysisAgent,
    summary: SummaryAgent,
    reply: ReplyAgent,
    knowledge: KnowledgeBase,
}

impl ResearchAgent {
    pub fn new(mode: SourceMode, config: &AgentConfig, services: AgentServices) -> AppResult<Self> {
        config.validate()?;
        let chunker = TextChunker::new(config.chunk_size, config.chunk_overlap)?;
        let settings = config.generation();

        let mut fetcher = Fetcher::new(services.encyclopedia, config.max_info_chars);
        if mode == SourceMode::DualSource {
            let preprints = services.preprints.ok_or_else(|| {
                AppError::Config("Dual-source agent needs a preprint source".to_string())
            })?;
            fetcher = fetcher.with_preprints(preprints, services.max_preprints);
        }

        Ok(Self {
            mode,
            fetcher,
            analysis: AnalysisAgent::new(services.llm.clone(), settings, mode),
            summary: SummaryAgent::new(services.llm.clone(), settings),
            reply: ReplyAgent::new(services.llm, settings),
            knowledge: KnowledgeBase::new(services.embedder, chunker),
        })
    }

    pub fn single_source(config: &AgentConfig, services: AgentServices) -> AppResult<Self> {
        Self::new(SourceMode::SingleSource, config, services)
    }

    pub fn dual_source(config: &AgentConfig, services: AgentServices) -> AppResult<Self> {
        Self::new(SourceMode::DualSource, config, services)
    }

    /// Build an agent against the real services described by `config`
    pub fn from_config(mode: SourceMode, config: &Config) -> AppResult<Self> {
        let services = AgentServices::from_config(config)?;
        Self::new(mode, &config.agent, services)
    }

    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub async fn gather_information(&self, topic: &str) -> AppResult<String> {
        validate_topic(topic)?;
        info!(topic = %topic, mode = %self.mode, "Gathering information");
        match self.mode {
            SourceMode::SingleSource => self.fetcher.fetch_single(topic).await,
            SourceMode::DualSource => self.fetcher.fetch_dual(topic).await,
        }
    }

    pub async fn analyze_information(&self, info: &str) -> AppResult<String> {
        self.analysis.analyze(info).await
    }

    pub async fn generate_summary(&self, analysis: &str) -> AppResult<String> {
        self.summary.summarize(analysis).await
    }

    /// Returns the number of chunks added
    pub async fn enrich_knowledge_base(&self, text: &str) -> AppResult<usize> {
        self.knowledge.enrich(text).await
    }

    /// Single-source agents return the nearest chunk itself; dual-source
    /// agents have the model answer the query from that chunk.
    pub async fn query_knowledge_base(&self, query: &str) -> AppResult<String> {
        let content = self.knowledge.query(query).await?;
        match self.mode {
            SourceMode::SingleSource => Ok(content),
            SourceMode::DualSource => self.reply.answer(query, &content).await,
        }
    }

    /// Gather, analyze and summarize one topic
    pub async fn run_pipeline(&self, topic: &str) -> AppResult<ResearchReport> {
        info!(topic = %topic, mode = %self.mode, "Starting research pipeline");

        let gathered = self.gather_information(topic).await?;
        let analysis = self.analyze_information(&gathered).await?;
        let summary = self.generate_summary(&analysis).await?;

        info!(
            gathered_len = gathered.len(),
            summary_len = summary.len(),
            "Research pipeline complete"
        );

        Ok(ResearchReport {
            topic: topic.to_string(),
            mode: self.mode,
            gathered,
            analysis,
            summary,
            generated_at: Utc::now(),
        })
    }
}

fn validate_topic(topic: &str) -> AppResult<()> {
    if topic.trim().is_empty() {
        return Err(AppError::InvalidRequest("Topic must not be empty".to_string()));
    }
    Ok(())
}
