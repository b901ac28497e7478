use serde::Serialize;
use ticket_store::{Ticket, TicketStatus};

/// Outcome of a follow-up, resolve or escalate call.
#[derive(Debug, Serialize)]
pub struct TicketActionResponse {
    pub ticket_id: String,
    pub status: TicketStatus,
    /// Assistant message logged on the ticket.
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_resolution_time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketListResponse {
    pub count: usize,
    pub tickets: Vec<Ticket>,
}
