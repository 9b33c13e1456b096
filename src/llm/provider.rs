use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::types::{AppError, AppResult, GenerationSettings, LLMMessage, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for an LLM provider
pub struct LLMProviderConfig {
    pub name: String,
    pub api_key: String,
    pub model: String,
    /// Only honoured by the "openai" provider
    pub api_base: Option<String>,
    pub client: Option<Client>,
}

impl LLMProviderConfig {
    pub fn from_config(config: &crate::config::Config, client: Option<Client>) -> AppResult<Self> {
        let api_key = config.llm.active_api_key().ok_or_else(|| {
            AppError::Config(format!(
                "No API key configured for provider {}",
                config.llm.default_provider
            ))
        })?;

        Ok(Self {
            name: config.llm.default_provider.clone(),
            api_key,
            model: config.llm.default_model.clone(),
            api_base: config.llm.openai_api_base.clone(),
            client,
        })
    }
}

pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    provider_name: String,
    model: String,
}

impl LLM {
    pub fn new(provider: LLMProviderConfig) -> AppResult<Self> {
        if provider.api_key.is_empty() {
            return Err(AppError::Config(format!("Empty API key for provider {}", provider.name)));
        }

        let adapter: Box<dyn LLMAdapter> = match provider.name.as_str() {
            "openai" => {
                let base = provider
                    .api_base
                    .as_deref()
                    .unwrap_or(crate::llm::openai::OPENAI_API_BASE);
                let client = provider.client.unwrap_or_default();
                Box::new(crate::llm::openai::OpenAIAdapter::with_client(client, &provider.api_key, base))
            }
            "groq" => Box::new(crate::llm::groq::GroqAdapter::with_client(
                provider.client.unwrap_or_default(),
                &provider.api_key,
            )),
            "openrouter" => Box::new(crate::llm::openrouter::OpenRouterAdapter::with_client(
                provider.client.unwrap_or_default(),
                &provider.api_key,
            )),
            other => return Err(AppError::Config(format!("Unsupported provider: {}", other))),
        };

        Ok(Self {
            adapter,
            provider_name: provider.name,
            model: provider.model,
        })
    }

    /// Wrap an existing adapter, e.g. a local or test double
    pub fn from_adapter(
        adapter: Box<dyn LLMAdapter>,
        provider_name: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            adapter,
            provider_name: provider_name.into(),
            model: model.into(),
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }

    /// Single-shot generation: one user prompt in, generated text out
    pub async fn generate(&self, prompt: &str, settings: &GenerationSettings) -> AppResult<String> {
        let request = LLMRequest {
            provider: self.provider_name.clone(),
            model: self.model.clone(),
            messages: vec![LLMMessage::user(prompt)],
            max_tokens: Some(settings.max_tokens),
            temperature: Some(settings.temperature),
            system_instruction: None,
        };

        let response = self.create_chat_completion(&request).await?;
        debug!(
            provider = %self.provider_name,
            total_tokens = response.usage.total_tokens,
            finish_reason = %response.finish_reason,
            "Generation complete"
        );
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenUsage;
    use std::sync::{Arc, Mutex};

    struct RecordingAdapter {
        seen: Arc<Mutex<Vec<LLMRequest>>>,
    }

    #[async_trait]
    impl LLMAdapter for RecordingAdapter {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(LLMResponse {
                content: "generated".to_string(),
                finish_reason: "stop".to_string(),
                usage: TokenUsage::default(),
            })
        }
    }

    fn provider(name: &str, key: &str) -> LLMProviderConfig {
        LLMProviderConfig {
            name: name.to_string(),
            api_key: key.to_string(),
            model: "gpt-4o-mini".to_string(),
            api_base: None,
            client: None,
        }
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        assert!(matches!(LLM::new(provider("mystery", "key")), Err(AppError::Config(_))));
    }

    #[test]
    fn test_empty_key_is_config_error() {
        assert!(matches!(LLM::new(provider("openai", "")), Err(AppError::Config(_))));
    }

    #[test]
    fn test_known_providers() {
        for name in ["openai", "groq", "openrouter"] {
            let llm = LLM::new(provider(name, "key")).unwrap();
            assert_eq!(llm.provider_name(), name);
        }
    }

    #[tokio::test]
    async fn test_generate_passes_settings() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let llm = LLM::from_adapter(
            Box::new(RecordingAdapter { seen: seen.clone() }),
            "test",
            "model-x",
        );
        let settings = GenerationSettings {
            temperature: 0.2,
            max_tokens: 42,
        };

        let text = llm.generate("hello", &settings).await.unwrap();
        assert_eq!(text, "generated");

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "model-x");
        assert_eq!(requests[0].max_tokens, Some(42));
        assert_eq!(requests[0].temperature, Some(0.2));
        assert_eq!(requests[0].messages, vec![LLMMessage::user("hello")]);
    }
}
