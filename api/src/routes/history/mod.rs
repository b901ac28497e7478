pub mod ingest_history_request;
pub mod ingest_history_response;
pub mod ingest_history_route;
