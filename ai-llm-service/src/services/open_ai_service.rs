//! OpenAI-compatible client: `POST /v1/chat/completions` and `POST /v1/embeddings`.
//!
//! Works against any server speaking the same wire format (vLLM, LM Studio)
//! as long as it accepts a bearer key.

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::http::{JsonClient, base_url};
use crate::chat::{ChatMessage, WireMessage, wire_messages};
use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{AiLlmError, Provider, ProviderError, ProviderErrorKind};

#[derive(Debug)]
pub struct OpenAiService {
    http: JsonClient,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

fn auth_headers(api_key: &str) -> Result<HeaderMap, AiLlmError> {
    let bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
        ProviderError::new(
            Provider::OpenAI,
            ProviderErrorKind::Decode(format!("API key is not a valid header value: {e}")),
        )
    })?;
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, bearer);
    Ok(headers)
}

impl OpenAiService {
    /// # Errors
    /// `InvalidProvider`, `MissingApiKey` or `InvalidEndpoint` on a bad config.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::OpenAI {
            return Err(ProviderError::new(Provider::OpenAI, ProviderErrorKind::InvalidProvider).into());
        }
        let key = cfg
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::new(Provider::OpenAI, ProviderErrorKind::MissingApiKey))?;
        let base = base_url(Provider::OpenAI, &cfg.endpoint)?;
        let http = JsonClient::new(Provider::OpenAI, &cfg, auth_headers(key)?)?;

        Ok(Self {
            http,
            url_chat: format!("{base}/v1/chat/completions"),
            url_embeddings: format!("{base}/v1/embeddings"),
            cfg,
        })
    }

    /// Non-streaming completion over `system`, `history`, then `prompt`.
    ///
    /// # Errors
    /// `EmptyChoices` when no choice carries content.
    #[instrument(skip_all, fields(model = %self.http.model(), history = history.len()))]
    pub async fn chat(
        &self,
        prompt: &str,
        system: Option<&str>,
        history: &[ChatMessage],
    ) -> Result<String, AiLlmError> {
        let body = ChatCompletionRequest {
            model: &self.cfg.model,
            messages: wire_messages(prompt, system, history),
            temperature: self.cfg.temperature,
            top_p: self.cfg.top_p,
            max_tokens: self.cfg.max_tokens,
        };
        let out: ChatCompletionResponse = self
            .http
            .post(&self.url_chat, &body, "`choices[0].message.content`")
            .await?;

        out.choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| self.http.fail(ProviderErrorKind::EmptyChoices))
    }

    #[instrument(skip_all, fields(model = %self.http.model(), input_len = input.len()))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };
        let out: EmbeddingsResponse = self
            .http
            .post(&self.url_embeddings, &body, "`data[0].embedding`")
            .await?;

        out.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| self.http.fail(ProviderErrorKind::Decode("empty `data`".into())))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}
