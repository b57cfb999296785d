use super::{AuditEntry, AuditSink};
use crate::error::AuditError;
use chrono::Utc;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use tokio::io::AsyncWriteExt;

/// Appends one JSON object per line to a per-day file under `dir`.
///
/// The file is created on first append; concurrent appends rely on
/// append-mode writes of single lines.
pub struct JsonlAuditSink {
    dir: PathBuf,
}

impl JsonlAuditSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_path(&self) -> PathBuf {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        self.dir.join(format!("guardrails-{date}.jsonl"))
    }
}

impl AuditSink for JsonlAuditSink {
    fn append<'a>(
        &'a self,
        entry: &'a AuditEntry,
    ) -> Pin<Box<dyn Future<Output = Result<(), AuditError>> + Send + 'a>> {
        Box::pin(async move {
            let path = self.file_path();
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await?;

            let line = serde_json::to_string(entry)?;
            file.write_all(line.as_bytes()).await?;
            file.write_all(b"\n").await?;
            Ok(())
        })
    }
}

/// Logs entries as structured tracing events.
///
/// For hosts that keep the audit trail in their log stream instead of a
/// dedicated file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingAuditSink {
    fn append<'a>(
        &'a self,
        entry: &'a AuditEntry,
    ) -> Pin<Box<dyn Future<Output = Result<(), AuditError>> + Send + 'a>> {
        Box::pin(async move {
            tracing::info!(
                request_id = entry.request_id.as_str(),
                path = %entry.path,
                llm_round_trips = entry.llm_round_trips,
                decided = entry.decision.is_some(),
                "Guardrail audit entry"
            );
            Ok(())
        })
    }
}
