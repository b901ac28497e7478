//! Shared LLM service used by the triage backend.
//!
//! - [`service_profiles::LlmServiceProfiles`] routes calls to the `fast`,
//!   `slow` and `embedding` profiles and caches one HTTP client per config.
//! - [`chat::ChatMessage`] carries prior conversation turns into a completion.
//! - [`health_service::HealthService`] probes provider reachability.
//! - [`telemetry`] exposes a library-scoped `tracing` layer for binaries.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use chat::{ChatMessage, ChatRole};
pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::AiLlmError;
pub use service_profiles::{LlmServiceProfiles, Profile};
