//! Ticket records as stored on disk.

use serde::{Deserialize, Serialize};

/// Timestamp layout used for every stored date.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    Resolved,
    #[serde(rename = "Needs Human Agent")]
    NeedsHumanAgent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub issue_summary: String,
    pub sentiment: String,
    pub priority: String,
    /// Empty until the ticket is resolved.
    pub solution: String,
    pub status: TicketStatus,
    pub opened_at: String,
    pub resolved_at: Option<String>,
    pub assigned_team: String,
    /// Fix proposed when the ticket was opened; becomes `solution` on resolve.
    #[serde(default)]
    pub suggested_solution: String,
    #[serde(default)]
    pub estimated_resolution_hours: Option<f64>,
    #[serde(default)]
    pub conversation: Vec<ConversationMessage>,
}

impl Ticket {
    /// First message the customer sent on this ticket.
    pub fn initial_question(&self) -> Option<&str> {
        self.conversation
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }

    /// Case-insensitive match on id, summary, solution or any message. `needle` must be lowercase.
    pub(crate) fn mentions(&self, needle: &str) -> bool {
        self.issue_summary.to_lowercase().contains(needle)
            || self.ticket_id.to_lowercase().contains(needle)
            || self.solution.to_lowercase().contains(needle)
            || self
                .conversation
                .iter()
                .any(|m| m.content.to_lowercase().contains(needle))
    }
}

/// Input for [`crate::TicketStore::create_ticket`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTicket {
    pub issue_summary: String,
    pub sentiment: String,
    pub priority: String,
    pub assigned_team: String,
    #[serde(default)]
    pub suggested_solution: String,
    #[serde(default)]
    pub estimated_resolution_hours: Option<f64>,
}

/// Whole database document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct TicketDb {
    #[serde(default)]
    pub unresolved: Vec<Ticket>,
    #[serde(default)]
    pub resolved: Vec<Ticket>,
}

impl TicketDb {
    /// `TECH_<n>` with `n` one past the highest existing number, starting at 200.
    pub fn next_ticket_id(&self) -> String {
        let next = self
            .unresolved
            .iter()
            .chain(&self.resolved)
            .filter_map(|t| t.ticket_id.strip_prefix("TECH_")?.parse::<u64>().ok())
            .max()
            .map_or(200, |n| n + 1);
        format!("TECH_{next}")
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Ticket> {
        self.unresolved
            .iter_mut()
            .chain(self.resolved.iter_mut())
            .find(|t| t.ticket_id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Ticket> {
        self.unresolved
            .iter()
            .chain(&self.resolved)
            .find(|t| t.ticket_id == id)
    }
}
