//! Follow-up answers grounded in the ticket's earlier exchange.

use tracing::instrument;

use crate::error::TriageError;
use crate::prompts::{self, FollowupFields};
use crate::providers::LanguageModel;
use crate::types::{ChatRole, ChatTurn};

pub const RECENT_TURNS: usize = 3;

/// Everything the follow-up prompt needs; nothing is read from shared state.
#[derive(Debug, Clone, Default)]
pub struct FollowupContext {
    pub recent: Vec<ChatTurn>,
    pub initial_question: String,
    pub issue_summary: String,
    pub suggested_solution: String,
    /// Falls back to `"support"` when unknown.
    pub assigned_team: Option<String>,
    pub question: String,
}

/// Last `n` user/assistant turns, oldest first; system turns are dropped.
pub fn recent_context(history: &[ChatTurn], n: usize) -> Vec<ChatTurn> {
    let turns: Vec<&ChatTurn> = history
        .iter()
        .filter(|t| matches!(t.role, ChatRole::User | ChatRole::Assistant))
        .collect();
    let skip = turns.len().saturating_sub(n);
    turns.into_iter().skip(skip).cloned().collect()
}

/// One model call with the whole context folded into the prompt.
#[instrument(skip_all, fields(recent = ctx.recent.len()))]
pub async fn answer_followup(
    model: &dyn LanguageModel,
    ctx: &FollowupContext,
) -> Result<String, TriageError> {
    if ctx.question.trim().is_empty() {
        return Err(TriageError::InvalidInput("follow-up question is empty".into()));
    }

    let conversation = ctx
        .recent
        .iter()
        .map(|t| format!("{}: {}", t.role, t.content))
        .collect::<Vec<_>>()
        .join("\n");

    let user = prompts::followup_user(&FollowupFields {
        conversation: &conversation,
        initial_question: &ctx.initial_question,
        issue_summary: &ctx.issue_summary,
        suggested_solution: &ctx.suggested_solution,
        assigned_team: ctx.assigned_team.as_deref().unwrap_or("support"),
        question: &ctx.question,
    });

    model.complete(&user, &prompts::followup_system(), &[]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedModel;

    fn turn(role: ChatRole, text: &str) -> ChatTurn {
        ChatTurn::new(role, text)
    }

    #[test]
    fn recent_context_keeps_last_user_assistant_turns() {
        let history = vec![
            turn(ChatRole::User, "1"),
            turn(ChatRole::System, "s"),
            turn(ChatRole::Assistant, "2"),
            turn(ChatRole::User, "3"),
            turn(ChatRole::Assistant, "4"),
        ];
        let out = recent_context(&history, 3);
        let texts: Vec<_> = out.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(texts, ["2", "3", "4"]);
        assert_eq!(recent_context(&history[..2], 3).len(), 1);
    }

    #[tokio::test]
    async fn prompt_carries_context_and_default_team() {
        let model = FixedModel::replying("Try re-pairing the hub.");
        let ctx = FollowupContext {
            recent: vec![turn(ChatRole::User, "hub offline")],
            initial_question: "hub offline".into(),
            issue_summary: "Hub disconnected".into(),
            suggested_solution: "Restart router".into(),
            assigned_team: None,
            question: "Still offline, now what?".into(),
        };

        let answer = answer_followup(&model, &ctx).await.unwrap();

        assert_eq!(answer, "Try re-pairing the hub.");
        let (prompt, history) = model.last_call().unwrap();
        assert!(prompt.contains("user: hub offline"));
        assert!(prompt.contains("Assigned team: support"));
        assert!(prompt.contains("Still offline, now what?"));
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn model_failure_is_returned() {
        let model = FixedModel::failing("503");
        let ctx = FollowupContext {
            question: "why?".into(),
            ..Default::default()
        };
        assert!(matches!(
            answer_followup(&model, &ctx).await,
            Err(TriageError::Dependency { .. })
        ));
    }
}
