//! Guardrails decision layer.
//!
//! Decides, before any model round trip or tool invocation, whether a request
//! has a deterministic closed-form answer, may take a bounded chat-only
//! guardrail pass, or is outside guardrail jurisdiction and must flow to the
//! permission-checked agent path.

pub mod detector;
pub mod pipeline;

pub use detector::{CannedAnswer, match_special_case};
pub use pipeline::GuardrailPipeline;

use crate::audit::{AuditEntry, AuditSink};
use crate::config::GuardrailsConfig;
use crate::error::ConfigError;
use crate::llm::ModelClient;
use crate::manifest;
use crate::routing::{Intent, RoutingSignal};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use strum::Display;
use tokio::sync::watch;

/// Sentinel the constrained prompt elicits when no guardrail applies.
/// A completion equal to this (after trimming) maps to "no decision".
pub const NO_GUARDRAIL_REPLY: &str = "NO_GUARDRAIL";

/// Guardrail policy setting, supplied per call and never persisted here.
///
/// String forms are exactly `"off"`, `"auto"`, `"always"`; anything else is a
/// configuration error returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GuardrailMode {
    /// Guardrails disabled entirely; every entry point returns nothing.
    Off,
    /// Opportunistic: deterministic fast-path matches only, never a model
    /// call.
    #[default]
    Auto,
    /// Fast path plus, on a miss, the single bounded model-assisted pass.
    Always,
}

impl FromStr for GuardrailMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            other => Err(ConfigError::Validation(format!(
                "unrecognized guardrail mode {other:?} (expected \"off\", \"auto\", or \"always\")"
            ))),
        }
    }
}

/// A guardrail-produced answer the caller should return to the user instead
/// of proceeding to the normal agent pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailDecision {
    pub answer_text: String,
    /// Zero only when no model client call occurred.
    pub llm_round_trips: u32,
}

impl GuardrailDecision {
    pub fn deterministic(answer_text: impl Into<String>) -> Self {
        Self {
            answer_text: answer_text.into(),
            llm_round_trips: 0,
        }
    }

    pub fn model_assisted(answer_text: impl Into<String>) -> Self {
        Self {
            answer_text: answer_text.into(),
            llm_round_trips: 1,
        }
    }
}

/// Top-level entry point. Owns the blocking policy and delegates to the
/// detector or the pipeline. Stateless across calls except for the
/// collaborators it holds.
pub struct Guardrails {
    audit: Arc<dyn AuditSink>,
    pipeline: GuardrailPipeline,
}

impl Guardrails {
    pub fn new(
        client: Arc<dyn ModelClient>,
        audit: Arc<dyn AuditSink>,
        config: &GuardrailsConfig,
    ) -> Self {
        let pipeline = GuardrailPipeline::new(
            client,
            Arc::clone(&audit),
            config.model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        );
        Self { audit, pipeline }
    }

    /// Synchronous deterministic check. Never suspends, never touches the
    /// model client or the audit sink.
    ///
    /// `Off` returns `None` unconditionally, without invoking the detector.
    pub fn try_deterministic_fast_path(
        &self,
        text: &str,
        mode: GuardrailMode,
    ) -> Option<GuardrailDecision> {
        if mode == GuardrailMode::Off {
            return None;
        }
        let hit = detector::match_special_case(text)?;
        tracing::info!(template = hit.template, "Guardrail fast path matched");
        Some(GuardrailDecision::deterministic(hit.answer))
    }

    /// Full guardrail attempt with a caller-supplied cancellation signal.
    ///
    /// The policy gate runs before any model interaction: a tool-oriented
    /// intent or a screen-reading request is refused here regardless of mode,
    /// including `Always`, and flows to the permission-checked path. The
    /// refusal is audited (mode permitting) so the request never vanishes
    /// silently.
    pub async fn try_run_with_cancel(
        &self,
        signal: &RoutingSignal,
        text: &str,
        mode: GuardrailMode,
        cancel: watch::Receiver<bool>,
    ) -> Option<GuardrailDecision> {
        if let Some(capability) = gated_capability(signal) {
            if mode != GuardrailMode::Off {
                let reason = refusal_reason(signal, capability);
                tracing::info!(
                    intent = %signal.intent,
                    capability,
                    "Request is outside guardrail jurisdiction"
                );
                self.append(AuditEntry::refused(text, reason)).await;
            }
            return None;
        }

        if mode == GuardrailMode::Off {
            return None;
        }

        self.pipeline.run(text, mode, cancel).await
    }

    /// [`Self::try_run_with_cancel`] without a cancellation signal.
    pub async fn try_run(
        &self,
        signal: &RoutingSignal,
        text: &str,
        mode: GuardrailMode,
    ) -> Option<GuardrailDecision> {
        let (_tx, cancel) = watch::channel(false);
        self.try_run_with_cancel(signal, text, mode, cancel).await
    }

    async fn append(&self, entry: AuditEntry) {
        if let Err(err) = self.audit.append(&entry).await {
            tracing::warn!(path = %entry.path, error = %err, "Audit append failed");
        }
    }
}

/// The manifest capability a signal would need, or `None` for plain chat.
///
/// Exhaustive over [`Intent`] so a new tool-oriented variant forces this
/// gate to be revisited.
fn gated_capability(signal: &RoutingSignal) -> Option<&'static str> {
    if signal.needs_screen_read {
        return Some("screen_capture");
    }
    match signal.intent {
        Intent::ChatOnly => None,
        Intent::ScreenObserve => Some("screen_capture"),
        Intent::WindowQuery => Some("get_active_window"),
        Intent::FileAccess => Some("file_read"),
        Intent::SystemCommand => Some("system_execute"),
        Intent::WebTask => Some("web_fetch"),
    }
}

fn refusal_reason(signal: &RoutingSignal, capability: &str) -> String {
    match manifest::builtin().get(capability) {
        Some(descriptor) => format!(
            "intent {} requires capability {} (permission: {})",
            signal.intent, descriptor.name, descriptor.permission
        ),
        None => format!("intent {} requires tool access", signal.intent),
    }
}
