//! Ollama client: `POST /api/chat` (non-streaming) and `POST /api/embed`.
//!
//! ```no_run
//! use ai_llm_service::{LlmModelConfig, LlmProvider};
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = LlmModelConfig {
//!     provider: LlmProvider::Ollama,
//!     model: "qwen3:14b".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     api_key: None,
//!     max_tokens: Some(256),
//!     temperature: Some(0.2),
//!     top_p: None,
//!     timeout_secs: Some(30),
//! };
//!
//! let svc = OllamaService::new(cfg)?;
//! let text = svc.chat("My thermostat is offline", Some("You triage support issues."), &[]).await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::http::{JsonClient, base_url};
use crate::chat::{ChatMessage, WireMessage, wire_messages};
use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{AiLlmError, Provider, ProviderErrorKind};

#[derive(Debug)]
pub struct OllamaService {
    http: JsonClient,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embed: String,
}

impl OllamaService {
    /// # Errors
    /// `InvalidProvider` for a non-Ollama config, `InvalidEndpoint` for an
    /// endpoint without http(s) scheme, transport error if the client cannot be built.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let http = JsonClient::new(Provider::Ollama, &cfg, HeaderMap::new())?;
        if cfg.provider != LlmProvider::Ollama {
            return Err(http.fail(ProviderErrorKind::InvalidProvider));
        }
        let base = base_url(Provider::Ollama, &cfg.endpoint)?;

        Ok(Self {
            http,
            url_chat: format!("{base}/api/chat"),
            url_embed: format!("{base}/api/embed"),
            cfg,
        })
    }

    /// One chat turn: `system`, then `history`, then `prompt`.
    #[instrument(skip_all, fields(model = %self.http.model(), history = history.len()))]
    pub async fn chat(
        &self,
        prompt: &str,
        system: Option<&str>,
        history: &[ChatMessage],
    ) -> Result<String, AiLlmError> {
        let body = ChatRequest {
            model: &self.cfg.model,
            messages: wire_messages(prompt, system, history),
            stream: false,
            options: ChatOptions {
                temperature: self.cfg.temperature,
                top_p: self.cfg.top_p,
                num_predict: self.cfg.max_tokens,
            },
        };

        let out: ChatResponse = self
            .http
            .post(&self.url_chat, &body, "`message.content`")
            .await?;
        // A reply without `message` reads as empty.
        Ok(out.message.map(|m| m.content).unwrap_or_default())
    }

    #[instrument(skip_all, fields(model = %self.http.model(), input_len = input.len()))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let body = EmbedRequest {
            model: &self.cfg.model,
            input,
        };
        let out: EmbedResponse = self
            .http
            .post(&self.url_embed, &body, "`embeddings: number[][]`")
            .await?;

        out.embeddings
            .into_iter()
            .next()
            .ok_or_else(|| self.http.fail(ProviderErrorKind::Decode("empty `embeddings`".into())))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Default, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::ProviderError;

    fn cfg(provider: LlmProvider, endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: "qwen3:14b".into(),
            endpoint: endpoint.into(),
            api_key: None,
            max_tokens: Some(64),
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn rejects_foreign_provider() {
        let err = OllamaService::new(cfg(LlmProvider::OpenAI, "http://localhost:11434"));
        assert!(matches!(
            err,
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::InvalidProvider,
                ..
            }))
        ));
    }

    #[test]
    fn builds_urls_without_double_slash() {
        let svc = OllamaService::new(cfg(LlmProvider::Ollama, "http://localhost:11434/")).unwrap();
        assert_eq!(svc.url_chat, "http://localhost:11434/api/chat");
        assert_eq!(svc.url_embed, "http://localhost:11434/api/embed");
    }

    #[test]
    fn max_tokens_maps_to_num_predict() {
        let c = cfg(LlmProvider::Ollama, "http://localhost:11434");
        let body = ChatRequest {
            model: &c.model,
            messages: wire_messages("hi", None, &[]),
            stream: false,
            options: ChatOptions {
                num_predict: c.max_tokens,
                ..Default::default()
            },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["options"], serde_json::json!({"num_predict": 64}));
        assert_eq!(v["stream"], false);
    }
}
