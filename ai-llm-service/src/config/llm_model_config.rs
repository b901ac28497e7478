use crate::config::llm_provider::LlmProvider;

/// Configuration for one LLM model invocation target.
///
/// - `provider`: backend (Ollama or OpenAI).
/// - `model`: model identifier (e.g. `"qwen3:14b"`, `"gpt-4o-mini"`).
/// - `endpoint`: base URL, without the API path.
/// - `api_key`: required for OpenAI, ignored by Ollama.
/// - `max_tokens`, `temperature`, `top_p`: sampling knobs, passed through when set.
/// - `timeout_secs`: request timeout (defaults to 60s in the clients).
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}
