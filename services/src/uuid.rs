use uuid::Uuid;

/// Deterministic UUIDv5 for a historical ticket id.
///
/// Re-indexing the same ticket always lands on the same Qdrant point, so an
/// ingest run is an upsert rather than a duplicate insert.
pub fn stable_uuid(ticket_id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, ticket_id.as_bytes())
}
