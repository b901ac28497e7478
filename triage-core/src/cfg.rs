//! Runtime knobs loaded from environment variables.

use crate::engine::DEFAULT_CANDIDATE_LIMIT;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriageConfig {
    /// Candidates requested from the similarity search (≥ 1).
    pub candidate_limit: usize,
    /// Entries in the "common fixes" list.
    pub common_solution_limit: usize,
    /// Turns folded into a follow-up prompt.
    pub followup_turns: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            common_solution_limit: 3,
            followup_turns: crate::followup::RECENT_TURNS,
        }
    }
}

impl TriageConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            candidate_limit: parse("TRIAGE_CANDIDATE_LIMIT", d.candidate_limit).max(1),
            common_solution_limit: parse("TRIAGE_COMMON_SOLUTIONS", d.common_solution_limit),
            followup_turns: parse("TRIAGE_FOLLOWUP_TURNS", d.followup_turns),
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}
