use super::types::{ChatMessage, Completion};
use crate::error::ClientError;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::watch;

/// Transport-agnostic language-model client.
///
/// Implementations take an ordered sequence of role-tagged messages plus a
/// cancellation signal and resolve to a [`Completion`] or a typed
/// [`ClientError`]. The cancellation receiver carries `true` once the caller
/// has given up; implementations should abort in-flight work when they
/// observe it, though the pipeline also abandons the future on its side.
pub trait ModelClient: Send + Sync {
    /// Client identifier used in logs and error messages.
    fn name(&self) -> &str;

    /// `model` is the configured model name; transports that serve a single
    /// model may ignore it.
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        model: &'a str,
        cancel: watch::Receiver<bool>,
    ) -> Pin<Box<dyn Future<Output = Result<Completion, ClientError>> + Send + 'a>>;
}
