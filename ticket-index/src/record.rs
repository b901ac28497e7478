//! Row and hit models.

use serde::{Deserialize, Serialize};

/// One historical support ticket as read from the history JSONL dump.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalTicket {
    #[serde(alias = "id", alias = "Ticket_ID")]
    pub ticket_id: String,
    /// Text that gets embedded and matched against new issues.
    #[serde(alias = "Issue_Category")]
    pub issue_summary: String,
    #[serde(default, alias = "Solution")]
    pub solution: String,
    #[serde(default, alias = "Ticket_Open_Date")]
    pub ticket_open_date: Option<String>,
    #[serde(default, alias = "Date_of_Resolution")]
    pub resolution_date: Option<String>,
    #[serde(alias = "Assigned_To_Team")]
    pub assigned_team: String,
    /// Precomputed vector; computed during ingest when absent.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

/// A single retrieval hit with its normalized similarity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TicketHit {
    /// Similarity in `[0, 1]`, rounded to 2 decimals.
    pub score: f64,
    pub ticket_id: Option<String>,
    pub issue_text: String,
    pub assigned_team: String,
    pub ticket_open_date: Option<String>,
    pub resolution_date: Option<String>,
    pub solution: Option<String>,
}
