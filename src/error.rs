use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Vigilis.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; host-facing code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum VigilisError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Model client ────────────────────────────────────────────────────
    #[error("client: {0}")]
    Client(#[from] ClientError),

    // ── Tool manifest ───────────────────────────────────────────────────
    #[error("manifest: {0}")]
    Manifest(#[from] ManifestError),

    // ── Audit ───────────────────────────────────────────────────────────
    #[error("audit: {0}")]
    Audit(#[from] AuditError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Model client errors ────────────────────────────────────────────────────

/// Typed failures from the language-model client collaborator.
///
/// The guardrail pipeline recovers from all of these locally; they never
/// surface to the end user.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("client {client} request failed: {message}")]
    Transport { client: String, message: String },

    #[error("client {client} returned an incomplete completion ({finish_reason})")]
    Incomplete {
        client: String,
        finish_reason: String,
    },

    #[error("client {client} timed out after {after_secs}s")]
    TimedOut { client: String, after_secs: u64 },
}

// ─── Tool manifest errors ───────────────────────────────────────────────────

/// Manifest integrity violations.
///
/// These are programming or configuration defects, fatal at registration
/// time; they are never produced per request.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("duplicate tool name: {0}")]
    DuplicateName(String),

    #[error("tool name is not snake_case: {0:?}")]
    InvalidName(String),

    #[error("tool {tool} has an empty {field} field")]
    EmptyField { tool: String, field: &'static str },

    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ─── Audit errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, VigilisError>;
