use std::{future::Future, pin::Pin};

use crate::errors::IndexError;

pub mod profiles;

/// Asynchronous embedding provider.
///
/// Implement this trait to plug in an embedding backend (Ollama, OpenAI, a stub in tests).
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>>;
}
