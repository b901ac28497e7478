use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct IngestHistoryRequest {
    /// JSONL file of resolved historical tickets, readable by the server.
    pub path: String,
}
