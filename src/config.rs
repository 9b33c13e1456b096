use crate::types::{AppError, AppResult, GenerationSettings};
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub llm: LLMConfig,
    pub agent: AgentConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub openai_api_key: String,
    pub groq_api_key: String,
    pub openrouter_api_key: String,
    pub default_provider: String,
    pub default_model: String,
    pub embedding_model: String,
    /// Overrides the OpenAI API base, e.g. for a local compatible server
    pub openai_api_base: Option<String>,
}

impl LLMConfig {
    /// API key for the configured provider, if one is set
    pub fn active_api_key(&self) -> Option<String> {
        let key = match self.default_provider.as_str() {
            "openai" => &self.openai_api_key,
            "groq" => &self.groq_api_key,
            "openrouter" => &self.openrouter_api_key,
            _ => return None,
        };
        if key.is_empty() {
            None
        } else {
            Some(key.clone())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub max_tokens: u32,
    /// Character budget applied to each gathered source
    pub max_info_chars: usize,
    pub temperature: f32,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            max_info_chars: 2000,
            temperature: 0.7,
            chunk_size: 1000,
            chunk_overlap: 0,
        }
    }
}

impl AgentConfig {
    pub fn generation(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 {
            return Err(AppError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.max_info_chars == 0 {
            return Err(AppError::Config("max_info_chars must be greater than zero".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub wikipedia_api_url: String,
    /// Retry a missing title with the best full-text search hit
    pub wikipedia_auto_suggest: bool,
    pub arxiv_api_url: String,
    pub arxiv_max_results: usize,
    pub http_timeout_secs: Option<u64>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            wikipedia_api_url: crate::search::wikipedia::WIKIPEDIA_API_URL.to_string(),
            wikipedia_auto_suggest: true,
            arxiv_api_url: crate::search::arxiv::ARXIV_API_URL.to_string(),
            arxiv_max_results: 5,
            http_timeout_secs: None,
        }
    }
}

impl SourcesConfig {
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let agent_defaults = AgentConfig::default();
        let source_defaults = SourcesConfig::default();

        let config = Self {
            llm: LLMConfig {
                openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
                openrouter_api_key: env::var("OPENROUTER_API_KEY").unwrap_or_default(),
                default_provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string()),
                default_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                embedding_model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| crate::embeddings::openai::DEFAULT_EMBEDDING_MODEL.to_string()),
                openai_api_base: env::var("OPENAI_API_BASE").ok(),
            },
            agent: AgentConfig {
                max_tokens: parse_env("AGENT_MAX_TOKENS", agent_defaults.max_tokens)?,
                max_info_chars: parse_env("AGENT_MAX_INFO_CHARS", agent_defaults.max_info_chars)?,
                temperature: parse_env("AGENT_TEMPERATURE", agent_defaults.temperature)?,
                chunk_size: parse_env("KNOWLEDGE_CHUNK_SIZE", agent_defaults.chunk_size)?,
                chunk_overlap: parse_env("KNOWLEDGE_CHUNK_OVERLAP", agent_defaults.chunk_overlap)?,
            },
            sources: SourcesConfig {
                wikipedia_api_url: env::var("WIKIPEDIA_API_URL")
                    .unwrap_or(source_defaults.wikipedia_api_url),
                wikipedia_auto_suggest: parse_env(
                    "WIKIPEDIA_AUTO_SUGGEST",
                    source_defaults.wikipedia_auto_suggest,
                )?,
                arxiv_api_url: env::var("ARXIV_API_URL").unwrap_or(source_defaults.arxiv_api_url),
                arxiv_max_results: parse_env("ARXIV_MAX_RESULTS", source_defaults.arxiv_max_results)?,
                http_timeout_secs: match env::var("HTTP_TIMEOUT_SECS") {
                    Ok(raw) => Some(parse_value("HTTP_TIMEOUT_SECS", &raw)?),
                    Err(_) => None,
                },
            },
        };

        config.agent.validate()?;
        Ok(config)
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{} has invalid value {:?}: {}", name, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults() {
        let agent = AgentConfig::default();
        assert_eq!(agent.max_tokens, 500);
        assert_eq!(agent.max_info_chars, 2000);
        assert_eq!(agent.chunk_size, 1000);
        assert_eq!(agent.chunk_overlap, 0);
        assert!(agent.validate().is_ok());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let agent = AgentConfig {
            chunk_overlap: 1000,
            ..AgentConfig::default()
        };
        assert!(matches!(agent.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_parse_value_reports_variable() {
        let err = parse_value::<u32>("AGENT_MAX_TOKENS", "lots").unwrap_err();
        assert!(err.to_string().contains("AGENT_MAX_TOKENS"));
        assert_eq!(parse_value::<f32>("AGENT_TEMPERATURE", " 0.2 ").unwrap(), 0.2);
    }

    #[test]
    fn test_active_api_key() {
        let mut llm = LLMConfig {
            openai_api_key: String::new(),
            groq_api_key: "gsk".to_string(),
            openrouter_api_key: String::new(),
            default_provider: "openai".to_string(),
            default_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            openai_api_base: None,
        };
        assert_eq!(llm.active_api_key(), None);

        llm.default_provider = "groq".to_string();
        assert_eq!(llm.active_api_key(), Some("gsk".to_string()));

        llm.default_provider = "unknown".to_string();
        assert_eq!(llm.active_api_key(), None);
    }
}
