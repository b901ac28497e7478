use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The database file is not a valid ticket document.
    #[error("ticket db decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("ticket {0} not found")]
    NotFound(String),

    /// Only unresolved tickets can be resolved.
    #[error("ticket {0} is already resolved")]
    AlreadyResolved(String),
}
