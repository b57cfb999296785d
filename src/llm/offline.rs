use super::traits::ModelClient;
use super::types::{ChatMessage, Completion};
use crate::error::ClientError;
use crate::guardrails::NO_GUARDRAIL_REPLY;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::watch;

/// Client for hosts running without model access.
///
/// Always declines to produce a guardrail answer, so the pipeline falls
/// through to "no decision" and the caller takes its normal path. Useful as
/// the host binary's default and in setups where only the deterministic
/// fast path is wanted even under mode `always`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineClient;

impl OfflineClient {
    pub fn new() -> Self {
        Self
    }
}

impl ModelClient for OfflineClient {
    fn name(&self) -> &str {
        "offline"
    }

    fn complete<'a>(
        &'a self,
        _messages: &'a [ChatMessage],
        _model: &'a str,
        _cancel: watch::Receiver<bool>,
    ) -> Pin<Box<dyn Future<Output = Result<Completion, ClientError>> + Send + 'a>> {
        Box::pin(async move { Ok(Completion::finished(NO_GUARDRAIL_REPLY)) })
    }
}
