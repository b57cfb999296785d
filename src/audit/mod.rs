pub mod sinks;

pub use sinks::{JsonlAuditSink, TracingAuditSink};

use crate::error::AuditError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use strum::Display;

/// Which branch of the decision layer settled a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GuardrailPath {
    /// The deterministic special-case detector produced the answer.
    Deterministic,
    /// The bounded model pass produced the answer.
    Model,
    /// Tool-oriented or screen-reading request; outside guardrail
    /// jurisdiction.
    Refused,
    /// No guardrail applied; the caller falls through to the agent path.
    NoDecision,
    /// The model client failed; treated as no decision.
    Failure,
    /// The caller cancelled before a decision was reached.
    Cancelled,
}

/// One record per coordinator `try_run` call, written after the decision is
/// finalized and never more than once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub request_id: String,
    pub input_text: String,
    pub path: GuardrailPath,
    /// Answer text when a decision was produced.
    pub decision: Option<String>,
    /// Refusal reason, failure detail, or cancellation note.
    pub reason: Option<String>,
    pub llm_round_trips: u32,
    pub recorded_at: String,
}

impl AuditEntry {
    fn stamp(input_text: &str, path: GuardrailPath) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            input_text: input_text.to_string(),
            path,
            decision: None,
            reason: None,
            llm_round_trips: 0,
            recorded_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn deterministic(input_text: &str, answer: impl Into<String>) -> Self {
        let mut entry = Self::stamp(input_text, GuardrailPath::Deterministic);
        entry.decision = Some(answer.into());
        entry
    }

    pub fn model(input_text: &str, answer: impl Into<String>) -> Self {
        let mut entry = Self::stamp(input_text, GuardrailPath::Model);
        entry.decision = Some(answer.into());
        entry.llm_round_trips = 1;
        entry
    }

    pub fn refused(input_text: &str, reason: impl Into<String>) -> Self {
        let mut entry = Self::stamp(input_text, GuardrailPath::Refused);
        entry.reason = Some(reason.into());
        entry
    }

    pub fn no_decision(input_text: &str, llm_round_trips: u32) -> Self {
        let mut entry = Self::stamp(input_text, GuardrailPath::NoDecision);
        entry.llm_round_trips = llm_round_trips;
        entry
    }

    pub fn failure(input_text: &str, detail: impl Into<String>, llm_round_trips: u32) -> Self {
        let mut entry = Self::stamp(input_text, GuardrailPath::Failure);
        entry.reason = Some(detail.into());
        entry.llm_round_trips = llm_round_trips;
        entry
    }

    pub fn cancelled(input_text: &str, llm_round_trips: u32) -> Self {
        let mut entry = Self::stamp(input_text, GuardrailPath::Cancelled);
        entry.reason = Some("cancelled by caller".to_string());
        entry.llm_round_trips = llm_round_trips;
        entry
    }
}

/// Append-only decision recorder.
///
/// Sinks must accept concurrent appends from in-flight calls; nothing in the
/// decision layer reads entries back.
pub trait AuditSink: Send + Sync {
    fn append<'a>(
        &'a self,
        entry: &'a AuditEntry,
    ) -> Pin<Box<dyn Future<Output = Result<(), AuditError>> + Send + 'a>>;
}
