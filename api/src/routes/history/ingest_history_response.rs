use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IngestHistoryResponse {
    pub message: String,
    pub collection: String,
    pub points_written: u64,
    /// Points in the collection after the upsert.
    pub total_indexed: u64,
}
