//! Conversation turns passed alongside a prompt.

use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    /// Wire name used by both Ollama `/api/chat` and OpenAI chat completions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prior turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Wire-level message shared by both provider payloads.
#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Orders messages as `system`, then history, then the user prompt.
pub(crate) fn wire_messages<'a>(
    prompt: &'a str,
    system: Option<&'a str>,
    history: &'a [ChatMessage],
) -> Vec<WireMessage<'a>> {
    let mut out = Vec::with_capacity(history.len() + 2);
    if let Some(sys) = system {
        out.push(WireMessage {
            role: ChatRole::System.as_str(),
            content: sys,
        });
    }
    for m in history {
        out.push(WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        });
    }
    out.push(WireMessage {
        role: ChatRole::User.as_str(),
        content: prompt,
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_sits_between_system_and_prompt() {
        let history = vec![
            ChatMessage::new(ChatRole::User, "my lights flicker"),
            ChatMessage::new(ChatRole::Assistant, "try a power cycle"),
        ];
        let msgs = wire_messages("still broken", Some("be brief"), &history);
        let roles: Vec<&str> = msgs.iter().map(|m| m.role).collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert_eq!(msgs.last().map(|m| m.content), Some("still broken"));
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
