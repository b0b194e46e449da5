use serde_json::Value;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{FinhubError, Result};
use crate::llm::api::LlmApiClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Chat-completion capability resolved once from configuration.
#[derive(Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    client: Option<LlmApiClient>,
    temperature: Option<f32>,
}

impl LlmProvider {
    pub fn new(config: Option<&LlmConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No LLM configuration provided");
        };

        let (provider, _model) = parse_llm_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => match &config.base_url {
                Some(base_url) => LlmBackend::OpenAICompatible {
                    base_url: base_url.clone(),
                },
                None => {
                    return Self::unavailable(&format!(
                        "Unknown provider in model: {}",
                        config.model
                    ))
                }
            },
        };

        match LlmApiClient::new(config) {
            Ok(client) => Self {
                backend,
                client: Some(client),
                temperature: config.temperature,
            },
            Err(e) => {
                tracing::warn!(model = %config.model, error = %e, "LLM client could not be created");
                Self::unavailable(&e.to_string())
            }
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            client: None,
            temperature: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub async fn complete_json(&self, system_prompt: Option<&str>, prompt: &str) -> Result<Value> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| FinhubError::LlmUnavailable(self.unavailable_reason()))?;

        let options = CompletionOptions {
            temperature: self.temperature,
            ..Default::default()
        };
        client.complete_json(system_prompt, prompt, Some(&options)).await
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            LlmBackend::Unavailable { reason } => reason.clone(),
            _ => "LLM client is not initialized".to_string(),
        }
    }
}
