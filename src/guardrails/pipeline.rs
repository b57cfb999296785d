//! Bounded, audited guardrail pass for chat-only requests.

use super::detector;
use super::{GuardrailDecision, GuardrailMode, NO_GUARDRAIL_REPLY};
use crate::audit::{AuditEntry, AuditSink};
use crate::error::ClientError;
use crate::llm::{ChatMessage, ModelClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Constrained prompt for the single model round trip. The model either
/// answers a self-answering question in one sentence or replies with the
/// exact no-guardrail sentinel.
const GUARDRAIL_SYSTEM_PROMPT: &str = "You are a guardrail check for a desktop assistant. \
You receive one user request. If it is a self-answering trick question, or has a single \
indisputable closed-form answer that needs no tools and no real reasoning, reply with that \
answer in one short sentence. For anything else, including anything that would need screen \
access, files, commands, the web, opinions, or multi-step reasoning, reply with exactly \
NO_GUARDRAIL and nothing else.";

/// Executes the guardrail pass: deterministic fast path first, then at most
/// one bounded model call, with exactly one audit entry per invocation.
pub struct GuardrailPipeline {
    client: Arc<dyn ModelClient>,
    audit: Arc<dyn AuditSink>,
    model: String,
    request_timeout: Duration,
}

impl GuardrailPipeline {
    pub fn new(
        client: Arc<dyn ModelClient>,
        audit: Arc<dyn AuditSink>,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client,
            audit,
            model: model.into(),
            request_timeout,
        }
    }

    /// Attempt to produce a safe chat answer for `text`.
    ///
    /// The fast path is always tried first and costs zero round trips. On a
    /// miss the model-assisted pass runs only under [`GuardrailMode::Always`];
    /// `auto` is fast-path-only. Client failures and cancellation degrade to
    /// `None`, never to an error, so the caller falls through to the normal
    /// permission-checked agent path.
    pub async fn run(
        &self,
        text: &str,
        mode: GuardrailMode,
        cancel: watch::Receiver<bool>,
    ) -> Option<GuardrailDecision> {
        if let Some(hit) = detector::match_special_case(text) {
            tracing::info!(template = hit.template, "Guardrail fast path matched");
            self.append(AuditEntry::deterministic(text, hit.answer)).await;
            return Some(GuardrailDecision::deterministic(hit.answer));
        }

        if mode != GuardrailMode::Always {
            self.append(AuditEntry::no_decision(text, 0)).await;
            return None;
        }

        if *cancel.borrow() {
            self.append(AuditEntry::cancelled(text, 0)).await;
            return None;
        }

        match self.model_pass(text, cancel).await {
            ModelOutcome::Answer(answer) => {
                tracing::info!(client = self.client.name(), "Guardrail model pass answered");
                self.append(AuditEntry::model(text, answer.as_str())).await;
                Some(GuardrailDecision::model_assisted(answer))
            }
            ModelOutcome::Declined => {
                self.append(AuditEntry::no_decision(text, 1)).await;
                None
            }
            ModelOutcome::Failed(err) => {
                tracing::warn!(
                    client = self.client.name(),
                    error = %err,
                    "Guardrail model pass failed; falling through"
                );
                self.append(AuditEntry::failure(text, err.to_string(), 1)).await;
                None
            }
            ModelOutcome::Cancelled => {
                self.append(AuditEntry::cancelled(text, 1)).await;
                None
            }
        }
    }

    /// The single suspension point: one client call, raced against the
    /// caller's cancellation signal and bounded by the request timeout.
    async fn model_pass(&self, text: &str, cancel: watch::Receiver<bool>) -> ModelOutcome {
        let messages = [
            ChatMessage::system(GUARDRAIL_SYSTEM_PROMPT),
            ChatMessage::user(text),
        ];

        let call = tokio::time::timeout(
            self.request_timeout,
            self.client.complete(&messages, &self.model, cancel.clone()),
        );

        // Biased so that when cancellation and a client result land on the
        // same wakeup, cancellation wins and the call is abandoned.
        let outcome = tokio::select! {
            biased;
            () = wait_for_cancel(cancel) => return ModelOutcome::Cancelled,
            outcome = call => outcome,
        };

        match outcome {
            Err(_elapsed) => ModelOutcome::Failed(ClientError::TimedOut {
                client: self.client.name().to_string(),
                after_secs: self.request_timeout.as_secs(),
            }),
            Ok(Err(err)) => ModelOutcome::Failed(err),
            Ok(Ok(completion)) if !completion.is_complete => {
                ModelOutcome::Failed(ClientError::Incomplete {
                    client: self.client.name().to_string(),
                    finish_reason: completion.finish_reason,
                })
            }
            Ok(Ok(completion)) => {
                let content = completion.content.trim().to_string();
                if content == NO_GUARDRAIL_REPLY || content.is_empty() {
                    ModelOutcome::Declined
                } else {
                    ModelOutcome::Answer(content)
                }
            }
        }
    }

    /// Best-effort append; a sink failure is logged and swallowed so it can
    /// never abort the caller's request.
    async fn append(&self, entry: AuditEntry) {
        if let Err(err) = self.audit.append(&entry).await {
            tracing::warn!(path = %entry.path, error = %err, "Audit append failed");
        }
    }
}

enum ModelOutcome {
    Answer(String),
    Declined,
    Failed(ClientError),
    Cancelled,
}

/// Resolves once the cancellation signal carries `true`. If the sender is
/// dropped without cancelling, stays pending so the client call wins the
/// race.
async fn wait_for_cancel(mut cancel: watch::Receiver<bool>) {
    if *cancel.borrow() {
        return;
    }
    while cancel.changed().await.is_ok() {
        if *cancel.borrow() {
            return;
        }
    }
    std::future::pending::<()>().await;
}
