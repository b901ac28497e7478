//! JSON-over-HTTP plumbing shared by the provider clients.

use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::config::llm_model_config::LlmModelConfig;
use crate::error_handler::{
    AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Endpoint with trailing slashes removed, or `InvalidEndpoint`.
pub(crate) fn base_url(provider: Provider, endpoint: &str) -> Result<String, AiLlmError> {
    let e = endpoint.trim();
    if e.starts_with("http://") || e.starts_with("https://") {
        Ok(e.trim_end_matches('/').to_string())
    } else {
        Err(ProviderError::new(provider, ProviderErrorKind::InvalidEndpoint(endpoint.to_string())).into())
    }
}

/// One `reqwest::Client` per model config, tagged with its provider for errors.
#[derive(Debug)]
pub(crate) struct JsonClient {
    client: reqwest::Client,
    provider: Provider,
    model: String,
}

impl JsonClient {
    pub fn new(provider: Provider, cfg: &LlmModelConfig, headers: HeaderMap) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            provider,
            model: cfg.model.clone(),
        })
    }

    /// POSTs `body` and decodes the reply as `T`.
    ///
    /// `shape` names the field the caller expects and ends up in decode errors.
    pub async fn post<B, T>(&self, url: &str, body: &B, shape: &str) -> Result<T, AiLlmError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let started = Instant::now();
        let resp = self.client.post(url).json(body).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(
                provider = ?self.provider,
                model = %self.model,
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "provider returned non-success status"
            );
            return Err(self.fail(ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            })));
        }

        let out = resp
            .json::<T>()
            .await
            .map_err(|e| self.fail(ProviderErrorKind::Decode(format!("{e}; expected {shape}"))))?;
        debug!(%url, latency_ms = started.elapsed().as_millis(), "provider call done");
        Ok(out)
    }

    pub fn fail(&self, kind: ProviderErrorKind) -> AiLlmError {
        ProviderError::new(self.provider, kind).into()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
