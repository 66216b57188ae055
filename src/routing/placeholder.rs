//! Per-route placeholder metadata.

use std::collections::HashMap;

/// Requirement used for placeholders without an explicit one.
pub const DEFAULT_REQUIREMENT: &str = r"\w+";

/// Constraint and default value of a single placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Regex fragment the captured value must match.
    pub requirement: String,
    /// Value used when the placeholder captured nothing.
    /// `Some` also makes the placeholder's capture optional.
    pub default: Option<String>,
}

impl Default for Placeholder {
    fn default() -> Self {
        Self {
            requirement: DEFAULT_REQUIREMENT.to_string(),
            default: None,
        }
    }
}

impl Placeholder {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Placeholder name → metadata.
///
/// Names missing from the table behave like `Placeholder::default()`.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderTable {
    entries: HashMap<String, Placeholder>,
}

impl PlaceholderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requirement for `name`, keeping any default already set.
    pub fn set_requirement(&mut self, name: impl Into<String>, requirement: impl Into<String>) {
        self.entries.entry(name.into()).or_default().requirement = requirement.into();
    }

    /// Set the default for `name`, keeping any requirement already set.
    pub fn set_default(&mut self, name: impl Into<String>, default: impl Into<String>) {
        self.entries.entry(name.into()).or_default().default = Some(default.into());
    }

    /// Metadata for `name`, falling back to `\w+` with no default.
    pub fn get(&self, name: &str) -> Placeholder {
        self.entries.get(name).cloned().unwrap_or_default()
    }

    pub fn default_for(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|p| p.default.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Placeholder)> {
        self.entries.iter()
    }
}
