//! Health probes for the configured LLM backends.
//!
//! - Ollama: `GET {endpoint}/api/tags`, then look for the configured model name.
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth, then look for the model id.
//!
//! [`HealthService::check`] never fails; errors become `ok = false`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for a single profile config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker reusing a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks one config. Any failure is folded into the returned status.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return HealthStatus::new(cfg, false, 0, "endpoint is empty or missing http/https");
        }

        let started = Instant::now();
        let status = match self.probe(cfg).await {
            Ok(found) => {
                let latency = started.elapsed().as_millis();
                if found {
                    HealthStatus::new(cfg, true, latency, "reachable; model is available")
                } else {
                    HealthStatus::new(cfg, false, latency, "reachable, but model is not listed")
                }
            }
            Err(e) => HealthStatus::new(cfg, false, started.elapsed().as_millis(), e.to_string()),
        };

        if status.ok {
            info!(provider = %status.provider, model = %status.model, latency_ms = status.latency_ms, "health probe ok");
        } else {
            warn!(provider = %status.provider, model = %status.model, message = %status.message, "health probe failed");
        }
        status
    }

    /// Checks several configs in order.
    pub async fn check_many(&self, configs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        debug!(count = configs.len(), "running batch health probes");
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    /// Returns whether the configured model is listed by the backend.
    async fn probe(&self, cfg: &LlmModelConfig) -> Result<bool, AiLlmError> {
        let base = cfg.endpoint.trim_end_matches('/');
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);

        let req = match cfg.provider {
            LlmProvider::Ollama => self.client.get(format!("{base}/api/tags")),
            LlmProvider::OpenAI => {
                let key = cfg.api_key.as_deref().ok_or_else(|| {
                    HealthError::Decode("missing OpenAI API key".into())
                })?;
                self.client
                    .get(format!("{base}/v1/models"))
                    .header(header::AUTHORIZATION, format!("Bearer {key}"))
            }
        };

        let resp = req.timeout(timeout).send().await?;
        let url = resp.url().to_string();
        if !resp.status().is_success() {
            let status = resp.status();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(HealthError::HttpStatus(HttpError { status, url, snippet }).into());
        }

        let names: Vec<String> = match cfg.provider {
            LlmProvider::Ollama => resp
                .json::<OllamaTags>()
                .await
                .map_err(|e| HealthError::Decode(e.to_string()))?
                .models
                .into_iter()
                .map(|m| m.name)
                .collect(),
            LlmProvider::OpenAI => resp
                .json::<OpenAiModels>()
                .await
                .map_err(|e| HealthError::Decode(e.to_string()))?
                .data
                .into_iter()
                .map(|m| m.id)
                .collect(),
        };

        Ok(names.iter().any(|n| model_matches(n, &cfg.model)))
    }
}

/// Ollama lists `name:latest` for models pulled without an explicit tag.
fn model_matches(listed: &str, wanted: &str) -> bool {
    listed == wanted || listed.strip_suffix(":latest") == Some(wanted)
}

#[derive(Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaTag>,
}

#[derive(Deserialize)]
struct OllamaTag {
    name: String,
}

#[derive(Deserialize)]
struct OpenAiModels {
    data: Vec<OpenAiModel>,
}

#[derive(Deserialize)]
struct OpenAiModel {
    id: String,
}
