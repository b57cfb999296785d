//! Tool manifest: the single source of truth for which capabilities exist
//! and which require explicit permission.
//!
//! Immutable after process start. Absence of `permission: "required"` on a
//! descriptor is an affirmative statement that the capability is safe to
//! invoke without interactive consent, so the permission-required subset must
//! cover everything that reads the screen, reads or lists the filesystem,
//! reads the active window, or executes an arbitrary system command.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReadWrite {
    Read,
    Write,
    ReadWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Permission {
    /// Invoking the tool needs interactive consent at the tool layer.
    Required,
    /// Safe to invoke without consent.
    None,
}

/// One capability the agent can expose. Field order is the canonical
/// serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub category: String,
    pub read_write: ReadWrite,
    pub permission: Permission,
    pub description: String,
}

impl ToolDescriptor {
    fn new(
        name: &str,
        category: &str,
        read_write: ReadWrite,
        permission: Permission,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            read_write,
            permission,
            description: description.to_string(),
        }
    }
}

/// Declarative registry of tool descriptors, validated at construction.
#[derive(Debug)]
pub struct ToolManifest {
    tools: Vec<ToolDescriptor>,
    /// Canonical JSON bytes, fixed at construction so repeated
    /// [`Self::serialize`] calls are byte-identical.
    canonical: Vec<u8>,
}

impl ToolManifest {
    /// Build a manifest, enforcing the integrity invariants: unique
    /// snake_case names and all five fields non-empty. A violation is a
    /// configuration defect, surfaced at registration time and never per
    /// request.
    pub fn new(tools: Vec<ToolDescriptor>) -> Result<Self, ManifestError> {
        let mut seen = std::collections::HashSet::new();
        for tool in &tools {
            if !is_snake_case(&tool.name) {
                return Err(ManifestError::InvalidName(tool.name.clone()));
            }
            if !seen.insert(tool.name.as_str()) {
                return Err(ManifestError::DuplicateName(tool.name.clone()));
            }
            if tool.category.is_empty() {
                return Err(ManifestError::EmptyField {
                    tool: tool.name.clone(),
                    field: "category",
                });
            }
            if tool.description.is_empty() {
                return Err(ManifestError::EmptyField {
                    tool: tool.name.clone(),
                    field: "description",
                });
            }
        }
        let canonical = serde_json::to_vec_pretty(&tools)?;
        Ok(Self { tools, canonical })
    }

    /// Descriptors in registration order, stable across calls.
    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Canonical JSON form. Byte-identical across calls within a process, so
    /// downstream consumers can hash or diff it.
    pub fn serialize(&self) -> &[u8] {
        &self.canonical
    }

    /// SHA-256 hex digest of the canonical serialization, for capability
    /// advertisement and audit correlation.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.canonical))
    }

    /// Names of every permission-gated capability, in registration order.
    pub fn permission_required(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter(|tool| tool.permission == Permission::Required)
            .map(|tool| tool.name.as_str())
            .collect()
    }
}

fn is_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// The Vigilis tool surface. Constructed once at first access; an integrity
/// violation here is fatal at startup.
static BUILTIN: LazyLock<ToolManifest> = LazyLock::new(|| {
    ToolManifest::new(builtin_descriptors()).expect("built-in tool manifest integrity")
});

pub fn builtin() -> &'static ToolManifest {
    &BUILTIN
}

fn builtin_descriptors() -> Vec<ToolDescriptor> {
    use Permission::{None as Free, Required};
    use ReadWrite::{Read, ReadWrite as Both, Write};

    vec![
        ToolDescriptor::new(
            "screen_capture",
            "screen",
            Read,
            Required,
            "Capture the current screen contents as an image.",
        ),
        ToolDescriptor::new(
            "screen_record",
            "screen",
            Read,
            Required,
            "Record the screen for a bounded duration.",
        ),
        ToolDescriptor::new(
            "get_active_window",
            "window",
            Read,
            Required,
            "Read the title and owning application of the focused window.",
        ),
        ToolDescriptor::new(
            "list_windows",
            "window",
            Read,
            Required,
            "List the titles of all open windows.",
        ),
        ToolDescriptor::new(
            "file_read",
            "files",
            Read,
            Required,
            "Read the contents of a file on disk.",
        ),
        ToolDescriptor::new(
            "file_list",
            "files",
            Read,
            Required,
            "List the entries of a directory.",
        ),
        ToolDescriptor::new(
            "file_write",
            "files",
            Write,
            Required,
            "Create or overwrite a file on disk.",
        ),
        ToolDescriptor::new(
            "system_execute",
            "process",
            Both,
            Required,
            "Execute an arbitrary system command and capture its output.",
        ),
        ToolDescriptor::new(
            "process_list",
            "process",
            Read,
            Required,
            "List running processes with their names and ids.",
        ),
        ToolDescriptor::new(
            "clipboard_read",
            "clipboard",
            Read,
            Required,
            "Read the current clipboard contents.",
        ),
        ToolDescriptor::new(
            "clipboard_write",
            "clipboard",
            Write,
            Free,
            "Replace the clipboard contents with given text.",
        ),
        ToolDescriptor::new(
            "notify_send",
            "notifications",
            Write,
            Free,
            "Show a desktop notification to the user.",
        ),
        ToolDescriptor::new(
            "web_fetch",
            "network",
            Read,
            Required,
            "Fetch the contents of a URL.",
        ),
        ToolDescriptor::new(
            "memory_store",
            "memory",
            Write,
            Free,
            "Store a fact in the assistant's long-term memory.",
        ),
        ToolDescriptor::new(
            "memory_recall",
            "memory",
            Read,
            Free,
            "Recall facts from the assistant's long-term memory.",
        ),
        ToolDescriptor::new(
            "calculate",
            "utility",
            Read,
            Free,
            "Evaluate an arithmetic expression.",
        ),
        ToolDescriptor::new(
            "unit_convert",
            "utility",
            Read,
            Free,
            "Convert a value between measurement units.",
        ),
        ToolDescriptor::new(
            "current_time",
            "time",
            Read,
            Free,
            "Report the current date and time in the user's locale.",
        ),
    ]
}
