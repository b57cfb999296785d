//! Host configuration for the guardrails core.
//!
//! Persisted as TOML under `~/.vigilis/config.toml`. Holds the default
//! guardrail mode plus collaborator settings; callers still pass the mode per
//! call, so nothing here is consulted on the per-request hot path.

use crate::guardrails::GuardrailMode;
use anyhow::{Context, Result, bail};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment override for the default guardrail mode. Takes precedence
/// over the persisted value; an unrecognized value is a hard error rather
/// than a silent fallback.
pub const MODE_ENV_VAR: &str = "VIGILIS_GUARDRAIL_MODE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailsConfig {
    /// Mode used when the caller does not specify one.
    #[serde(default)]
    pub default_mode: GuardrailMode,

    /// Model name handed to the client for the bounded guardrail pass.
    #[serde(default = "default_model")]
    pub model: String,

    /// Deadline for the single model round trip.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory for the JSONL audit sink. Tilde-expanded at use.
    #[serde(default = "default_audit_dir")]
    pub audit_dir: String,
}

fn default_model() -> String {
    "claude-sonnet-4-5".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_audit_dir() -> String {
    "~/.vigilis/audit".to_string()
}

impl Default for GuardrailsConfig {
    fn default() -> Self {
        Self {
            default_mode: GuardrailMode::default(),
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            audit_dir: default_audit_dir(),
        }
    }
}

impl GuardrailsConfig {
    /// Load `~/.vigilis/config.toml`, writing the defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let vigilis_dir = home.join(".vigilis");
        if !vigilis_dir.exists() {
            fs::create_dir_all(&vigilis_dir).context("Failed to create .vigilis directory")?;
        }

        let config_path = vigilis_dir.join("config.toml");
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, toml_str)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(MODE_ENV_VAR) {
            self.default_mode =
                GuardrailMode::from_str(&raw).with_context(|| format!("invalid {MODE_ENV_VAR}"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            bail!("model must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be positive");
        }
        if self.audit_dir.trim().is_empty() {
            bail!("audit_dir must not be empty");
        }
        Ok(())
    }

    /// Audit directory with `~` expanded.
    pub fn audit_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.audit_dir).into_owned())
    }
}
