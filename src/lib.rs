#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

//! Vigilis guardrails core.
//!
//! The decision layer that sits between a natural-language request, the
//! upstream intent classifier, and a tool-capable agent. It answers known
//! trick questions deterministically, runs a bounded audited model pass for
//! chat-only requests, and refuses to short-circuit anything that needs a
//! permission-gated capability.

pub mod audit;
pub mod config;
pub mod error;
pub mod guardrails;
pub mod llm;
pub mod manifest;
pub mod routing;

pub use audit::{AuditEntry, AuditSink, GuardrailPath, JsonlAuditSink, TracingAuditSink};
pub use config::GuardrailsConfig;
pub use error::{AuditError, ClientError, ConfigError, ManifestError, VigilisError};
pub use guardrails::{GuardrailDecision, GuardrailMode, GuardrailPipeline, Guardrails};
pub use llm::{ChatMessage, ChatRole, Completion, ModelClient, OfflineClient};
pub use manifest::{Permission, ReadWrite, ToolDescriptor, ToolManifest};
pub use routing::{Intent, RoutingSignal};
