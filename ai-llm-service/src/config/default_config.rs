//! Default LLM configs loaded strictly from environment variables.
//!
//! Three roles are configured per provider:
//!
//! - **Fast**      → issue summaries (short structured answers)
//! - **Slow**      → team assignment fallback and follow-up answers
//! - **Embedding** → vectors for the historical-ticket index
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`       = `ollama` (default) or `openai`
//! - `LLM_MAX_TOKENS` = optional max tokens (u32)
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = slow model (mandatory)
//! - `OLLAMA_MODEL_FAST`           = fast model (falls back to `OLLAMA_MODEL`)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)
//!
//! OpenAI:
//! - `OPENAI_API_KEY`         = key (mandatory)
//! - `OPENAI_URL`             = endpoint (default `https://api.openai.com`)
//! - `OPENAI_MODEL`           = chat model (default `gpt-4o-mini`)
//! - `OPENAI_EMBEDDING_MODEL` = embedding model (default `text-embedding-3-small`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_u32, must_env, validate_http_endpoint,
    },
};

/// `(fast, slow, embedding)` as read from the environment.
pub type ProfileConfigs = (LlmModelConfig, LlmModelConfig, LlmModelConfig);

/// Reads `LLM_KIND` and builds all three profiles for that provider.
///
/// # Errors
/// [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`, plus any
/// error of the provider-specific constructors.
pub fn profiles_from_env() -> Result<ProfileConfigs, AiLlmError> {
    let kind = env_opt("LLM_KIND").unwrap_or_else(|| "ollama".into());
    let provider = kind
        .parse::<LlmProvider>()
        .map_err(ConfigError::UnsupportedProvider)?;

    match provider {
        LlmProvider::Ollama => Ok((
            config_ollama_fast()?,
            config_ollama_slow()?,
            config_ollama_embedding()?,
        )),
        LlmProvider::OpenAI => Ok((
            config_openai_chat(Some(0.3))?,
            config_openai_chat(Some(0.2))?,
            config_openai_embedding()?,
        )),
    }
}

/// Resolves the Ollama endpoint.
///
/// Precedence: `OLLAMA_URL`, then `OLLAMA_PORT` → `http://localhost:{port}`.
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Some(url) = env_opt("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = env_opt("OLLAMA_PORT") {
        port.trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{}", port.trim()));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

/// Slow/quality Ollama model (`OLLAMA_MODEL`), low temperature.
pub fn config_ollama_slow() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: must_env("OLLAMA_MODEL")?,
        endpoint: ollama_endpoint()?,
        api_key: None,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(600),
    })
}

/// Fast Ollama model (`OLLAMA_MODEL_FAST`, falling back to `OLLAMA_MODEL`).
pub fn config_ollama_fast() -> Result<LlmModelConfig, AiLlmError> {
    let model = env_opt("OLLAMA_MODEL_FAST")
        .or_else(|| env_opt("OLLAMA_MODEL"))
        .ok_or(ConfigError::MissingVar("OLLAMA_MODEL_FAST or OLLAMA_MODEL"))?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint: ollama_endpoint()?,
        api_key: None,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.3),
        top_p: Some(0.9),
        timeout_secs: Some(120),
    })
}

/// Ollama embedding model (`EMBEDDING_MODEL`), deterministic.
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: must_env("EMBEDDING_MODEL")?,
        endpoint: ollama_endpoint()?,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}

fn openai_endpoint() -> Result<String, AiLlmError> {
    let url = env_opt("OPENAI_URL").unwrap_or_else(|| "https://api.openai.com".into());
    validate_http_endpoint("OPENAI_URL", &url)?;
    Ok(url)
}

/// OpenAI chat model (`OPENAI_MODEL`) with the given temperature.
pub fn config_openai_chat(temperature: Option<f32>) -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: env_opt("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".into()),
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature,
        top_p: None,
        timeout_secs: Some(120),
    })
}

/// OpenAI embedding model (`OPENAI_EMBEDDING_MODEL`).
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: env_opt("OPENAI_EMBEDDING_MODEL")
            .unwrap_or_else(|| "text-embedding-3-small".into()),
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(30),
    })
}
