use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message in the ordered sequence sent to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A completion returned by the model client.
///
/// `is_complete` is false when the model stopped before a usable end of turn
/// (length cutoff, content filter). The guardrail pipeline treats such a
/// completion as a collaborator failure, never as an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub is_complete: bool,
    pub content: String,
    pub finish_reason: String,
}

impl Completion {
    /// A completion that reached a natural end of turn.
    pub fn finished(content: impl Into<String>) -> Self {
        Self {
            is_complete: true,
            content: content.into(),
            finish_reason: "end_turn".to_string(),
        }
    }

    /// A completion cut off before a usable end of turn.
    pub fn truncated(content: impl Into<String>, finish_reason: impl Into<String>) -> Self {
        Self {
            is_complete: false,
            content: content.into(),
            finish_reason: finish_reason.into(),
        }
    }
}
