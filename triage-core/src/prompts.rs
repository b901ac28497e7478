//! Prompt text for the summarizer, the team-assignment fallback and follow-ups.

use crate::types::ChatTurn;

const PRODUCT_BRIEF: &str = "The company ships a Smart Home Automation App that lets users control \
thermostats, security cameras, smart lights and automation routines remotely. The app syncs data \
across devices in real time, integrates a payment gateway for premium features and handles device \
onboarding. It runs on phones, tablets and laptops.";

pub const SUMMARY_SYSTEM: &str = "You are a support analyst. You summarize customer conversations, \
detect sentiment and priority, and recommend a concrete fix in about 100 words. \
Typical issues: software installation failures, network connectivity drops, device compatibility \
errors, account sync problems between devices, and payment gateway failures during renewals.";

pub const ASSIGNMENT_SYSTEM: &str = "You are a technical support team assignment expert. \
Analyze the issue, assign it to the right team, give a reason, and estimate the resolution time \
from the complexity of the issue.";

pub const FOLLOWUP_SYSTEM: &str = "You are a Smart Home Automation App support agent answering \
follow-up questions. Stay consistent with the earlier conversation. Users typically report \
software installation failures, network connectivity problems, device compatibility errors, \
account synchronization issues and payment gateway malfunctions.";

/// Teams the fallback may assign to, with their responsibilities.
pub const TEAMS: &[(&str, &str)] = &[
    ("Software", "App crashes, installation errors, update failures, feature malfunctions"),
    ("Network", "Internet connectivity, API endpoints, DNS issues, VPN conflicts"),
    ("Device", "Hardware compatibility, thermostat issues, overheating, Bluetooth connectivity"),
    ("Account", "Login issues, data syncing across devices, profile management, authentication"),
    ("Payments", "Transaction failures, subscription renewal issues, payment gateway integration"),
];

pub fn summary_system() -> String {
    format!("{SUMMARY_SYSTEM}\n\n{PRODUCT_BRIEF}")
}

pub fn summary_user(conversation: &str) -> String {
    format!(
        "For the conversation below:\n\
         1. Summarize the issue in one sentence (under 15 words).\n\
         2. Detect the customer's sentiment (Urgent / Confused / Annoyed / Anxious / Happy).\n\
         3. Set a priority level (Critical / High / Medium / Low).\n\
         4. Recommend a solution in about 100 words.\n\n\
         Reply with only a JSON object with the keys \"summary\", \"sentiment\", \"priority\", \"solution\".\n\n\
         Conversation: {conversation}"
    )
}

pub fn assignment_system() -> String {
    format!("{ASSIGNMENT_SYSTEM}\n\n{PRODUCT_BRIEF}")
}

/// Previous turns as `role: content` lines followed by the issue and the team list.
pub fn assignment_user(context: &[ChatTurn], issue_text: &str) -> String {
    let mut out = String::new();
    if !context.is_empty() {
        out.push_str("Previous conversation:\n");
        for turn in context {
            out.push_str(&format!("{}: {}\n", turn.role, turn.content));
        }
        out.push('\n');
    }

    let names = TEAMS.iter().map(|(n, _)| *n).collect::<Vec<_>>().join(", ");
    out.push_str(&format!(
        "Given this technical support issue: '{issue_text}'\n\n\
         Assign it to one of these teams: {names}.\n\n\
         Respond in JSON with:\n\
         - assigned_team\n\
         - reason\n\
         - estimated_resolution_hours (based on complexity)\n\n\
         Teams and their responsibilities:\n"
    ));
    for (name, duties) in TEAMS {
        out.push_str(&format!("- {name}: {duties}\n"));
    }
    out.push_str("\nOnly return the JSON object, no other text.");
    out
}

pub fn followup_system() -> String {
    format!("{FOLLOWUP_SYSTEM}\n\n{PRODUCT_BRIEF}")
}

pub struct FollowupFields<'a> {
    pub conversation: &'a str,
    pub initial_question: &'a str,
    pub issue_summary: &'a str,
    pub suggested_solution: &'a str,
    pub assigned_team: &'a str,
    pub question: &'a str,
}

pub fn followup_user(f: &FollowupFields<'_>) -> String {
    format!(
        "Previous conversation summary:\n{}\n\n\
         Recent interaction:\n\
         User's initial question: {}\n\
         Problem summary: {}\n\
         Our suggested solution: {}\n\
         Assigned team: {}\n\n\
         User's follow-up question: {}\n\n\
         Answer the follow-up concisely and directly, keeping continuity with the discussion above.",
        f.conversation,
        f.initial_question,
        f.issue_summary,
        f.suggested_solution,
        f.assigned_team,
        f.question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatRole;

    #[test]
    fn assignment_prompt_embeds_context_and_teams() {
        let ctx = vec![
            ChatTurn::new(ChatRole::User, "my lights blink"),
            ChatTurn::new(ChatRole::Assistant, "which model?"),
        ];
        let p = assignment_user(&ctx, "Bulbs flicker after update");
        assert!(p.starts_with("Previous conversation:\nuser: my lights blink\nassistant: which model?\n"));
        assert!(p.contains("'Bulbs flicker after update'"));
        for (name, _) in TEAMS {
            assert!(p.contains(&format!("- {name}: ")));
        }
    }

    #[test]
    fn assignment_prompt_without_context() {
        let p = assignment_user(&[], "Refund missing");
        assert!(p.starts_with("Given this technical support issue"));
    }
}
