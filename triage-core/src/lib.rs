//! Support-ticket triage core.
//!
//! [`AssignmentEngine`] summarizes an issue, searches similar historical
//! tickets with the summary, and either votes on a team from good matches
//! (similarity ≥ 0.3) or asks the language model and parses its reply.
//! Collaborators sit behind the traits in [`providers`]; [`adapters`] wires
//! them to the LLM service and the ticket index.

pub mod adapters;
pub mod cfg;
mod engine;
mod error;
pub mod followup;
pub mod parser;
pub mod prompts;
pub mod providers;
pub mod replies;
pub mod solutions;
mod summarizer;
mod types;
pub mod voting;

#[cfg(test)]
mod testing;

pub use cfg::TriageConfig;
pub use engine::{AssignmentEngine, DEFAULT_CANDIDATE_LIMIT, GOOD_MATCH_THRESHOLD, has_good_match};
pub use error::TriageError;
pub use summarizer::LlmSummarizer;
pub use types::{
    AssignmentResult, AssignmentSource, ChatRole, ChatTurn, HistoricalAssignment, IssueSummary,
    LanguageModelAssignment, SimilarIssue, TriageOutcome,
};
pub use voting::DEFAULT_RESOLUTION_HOURS;
