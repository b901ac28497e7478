pub mod dashboard;
pub mod health;
pub mod history;
pub mod tickets;
pub mod triage;
