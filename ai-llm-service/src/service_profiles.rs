//! Profile routing over the provider clients.
//!
//! Triage asks `fast` for issue summaries, `slow` for the assignment fallback
//! and follow-up answers, and `embedding` for ticket vectors. A missing `slow`
//! config reuses `fast`.
//!
//! Build once and share behind an `Arc`. Provider clients are created on first
//! use and cached per (provider, endpoint, model, key, timeout).

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    chat::ChatMessage,
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Fast,
    Slow,
    Embedding,
}

/// A constructed client for one config.
#[derive(Clone)]
enum Client {
    Ollama(Arc<OllamaService>),
    OpenAi(Arc<OpenAiService>),
}

impl Client {
    fn build(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::Ollama => Client::Ollama(Arc::new(OllamaService::new(cfg.clone())?)),
            LlmProvider::OpenAI => Client::OpenAi(Arc::new(OpenAiService::new(cfg.clone())?)),
        })
    }

    async fn chat(
        &self,
        prompt: &str,
        system: Option<&str>,
        history: &[ChatMessage],
    ) -> Result<String, AiLlmError> {
        match self {
            Client::Ollama(c) => c.chat(prompt, system, history).await,
            Client::OpenAi(c) => c.chat(prompt, system, history).await,
        }
    }

    async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match self {
            Client::Ollama(c) => c.embeddings(input).await,
            Client::OpenAi(c) => c.embeddings(input).await,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

pub struct LlmServiceProfiles {
    fast: LlmModelConfig,
    slow: LlmModelConfig,
    embedding: LlmModelConfig,
    clients: RwLock<HashMap<ClientKey, Client>>,
    health: HealthService,
}

impl LlmServiceProfiles {
    /// `slow` falls back to `fast` when `None`.
    pub fn new(
        fast: LlmModelConfig,
        slow: Option<LlmModelConfig>,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        Ok(Self {
            slow: slow.unwrap_or_else(|| fast.clone()),
            fast,
            embedding,
            clients: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Chat completion on `profile`; `history` goes between `system` and `prompt`.
    pub async fn chat(
        &self,
        profile: Profile,
        prompt: &str,
        system: Option<&str>,
        history: &[ChatMessage],
    ) -> Result<String, AiLlmError> {
        let cfg = self.config(profile);
        debug!(?profile, model = %cfg.model, "chat dispatch");
        self.client(cfg).await?.chat(prompt, system, history).await
    }

    /// Embedding vector from the `embedding` profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        self.client(&self.embedding).await?.embeddings(input).await
    }

    /// One probe per distinct config.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        self.health.check_many(&self.distinct_configs()).await
    }

    pub fn config(&self, profile: Profile) -> &LlmModelConfig {
        match profile {
            Profile::Fast => &self.fast,
            Profile::Slow => &self.slow,
            Profile::Embedding => &self.embedding,
        }
    }

    fn distinct_configs(&self) -> Vec<LlmModelConfig> {
        let mut list: Vec<LlmModelConfig> = Vec::with_capacity(3);
        for cfg in [&self.fast, &self.slow, &self.embedding] {
            if !list.contains(cfg) {
                list.push(cfg.clone());
            }
        }
        list
    }

    async fn client(&self, cfg: &LlmModelConfig) -> Result<Client, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(c) = self.clients.read().await.get(&key) {
            return Ok(c.clone());
        }

        let mut cache = self.clients.write().await;
        if let Some(c) = cache.get(&key) {
            return Ok(c.clone());
        }
        let built = Client::build(cfg)?;
        cache.insert(key, built.clone());
        Ok(built)
    }
}
