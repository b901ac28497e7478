//! Ticket database: open and resolved tables, per-ticket conversation log,
//! and the dashboard analytics computed over them.

pub mod analytics;
pub mod errors;
pub mod model;
pub mod store;

pub use analytics::{DashboardOverview, IssueCount, OpenTicketAge};
pub use errors::StoreError;
pub use model::{ConversationMessage, NewTicket, TIMESTAMP_FORMAT, Ticket, TicketStatus};
pub use store::TicketStore;
