use serde::{Deserialize, Serialize};

/// Canonical identifier for a process.
///
/// Names are matched case-insensitively, so the constructor normalizes them
/// once (trim surrounding whitespace, lower-case) and every name that reaches
/// the store is already in canonical form. Lookups are then plain exact
/// matches on the normalized key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessName(String);

impl ProcessName {
    /// Creates a normalized process name from raw client input.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Returns the normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProcessName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProcessName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// A complete process record: a name plus its two JSON documents.
///
/// The documents are opaque to this crate; they are persisted as serialized
/// JSON text and handed back as parsed values.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    pub name: ProcessName,
    pub workspace: serde_json::Value,
    pub current_warnings: serde_json::Value,
}

impl ProcessRecord {
    /// Creates a record from a raw name and its documents.
    pub fn new(
        name: impl Into<ProcessName>,
        workspace: serde_json::Value,
        current_warnings: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            workspace,
            current_warnings,
        }
    }
}

impl From<ProcessName> for String {
    fn from(name: ProcessName) -> Self {
        name.0
    }
}
