use serde::{Deserialize, Serialize};
use strum::Display;

/// What the upstream classifier believes the user wants.
///
/// Closed set: every consumer must match exhaustively, so adding a
/// tool-oriented variant forces each policy gate to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    /// Plain conversation; no capability beyond text generation.
    ChatOnly,
    /// Wants the assistant to look at the screen.
    ScreenObserve,
    /// Wants the title or owner of a window.
    WindowQuery,
    /// Wants files read, listed, or written.
    FileAccess,
    /// Wants a system command executed.
    SystemCommand,
    /// Wants a URL fetched or opened.
    WebTask,
}

impl Intent {
    /// Whether this intent requires a capability from the tool manifest.
    ///
    /// Tool-oriented requests are outside guardrail jurisdiction and must
    /// flow through the permission-checked agent path.
    pub fn is_tool_oriented(self) -> bool {
        match self {
            Intent::ChatOnly => false,
            Intent::ScreenObserve
            | Intent::WindowQuery
            | Intent::FileAccess
            | Intent::SystemCommand
            | Intent::WebTask => true,
        }
    }
}

/// One classifier verdict for one request. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingSignal {
    pub intent: Intent,
    pub needs_screen_read: bool,
    /// Classifier confidence in `[0, 1]`. Informational in this layer;
    /// thresholding, if any, belongs to the classifier.
    pub confidence: f64,
}

impl RoutingSignal {
    pub fn new(intent: Intent, needs_screen_read: bool, confidence: f64) -> Self {
        Self {
            intent,
            needs_screen_read,
            confidence,
        }
    }

    /// Signal for a plain conversational request.
    pub fn chat_only(confidence: f64) -> Self {
        Self::new(Intent::ChatOnly, false, confidence)
    }
}
