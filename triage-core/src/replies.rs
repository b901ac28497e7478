//! Assistant messages logged on the ticket at each step.

use crate::solutions::format_resolution_time;
use crate::types::{AssignmentResult, IssueSummary};
use crate::voting::DEFAULT_RESOLUTION_HOURS;

pub const RESOLVED_REPLY: &str =
    "Great! I'm glad I could help solve your issue. Is there anything else you need help with?";

/// Hours shown to the customer; an unparsed fallback shows the default day.
pub fn displayed_hours(assignment: &AssignmentResult) -> f64 {
    assignment
        .estimated_resolution_hours()
        .unwrap_or(DEFAULT_RESOLUTION_HOURS)
}

pub fn initial_reply(summary: &IssueSummary, assignment: &AssignmentResult) -> String {
    format!(
        "I've analyzed your issue which appears to be about '{}'. \
         Here's a suggested solution: {}\n\n\
         Estimated resolution time: {}\n\n\
         Is this helpful? If not, I can create a support ticket for you.",
        summary.summary,
        summary.solution,
        format_resolution_time(displayed_hours(assignment))
    )
}

pub fn escalation_reply(ticket_id: &str, team: &str, hours: f64) -> String {
    format!(
        "I've created a support ticket for you (#{ticket_id}). \
         A human agent from our {team} team will contact you shortly. \
         The estimated resolution time is {}. Thank you for your patience.",
        format_resolution_time(hours)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsed_assignment_shows_one_day() {
        let summary = IssueSummary {
            summary: "Payment failed".into(),
            sentiment: "Annoyed".into(),
            priority: "High".into(),
            solution: "Retry with another card".into(),
            raw_response: String::new(),
        };
        let a = AssignmentResult::Unparsed {
            raw_response: "?".into(),
        };
        let text = initial_reply(&summary, &a);
        assert!(text.contains("'Payment failed'"));
        assert!(text.contains("Estimated resolution time: 1 days"));
    }

    #[test]
    fn escalation_names_ticket_and_team() {
        let text = escalation_reply("TECH_201", "Network", 3.0);
        assert!(text.contains("(#TECH_201)"));
        assert!(text.contains("our Network team"));
        assert!(text.contains("3 hours"));
    }
}
