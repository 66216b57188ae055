//! Response format negotiation.
//!
//! The negotiated format is returned to the caller and never stored on the
//! route. When no configured mime type appears in the `Accept` value, the
//! default format (`json`) is used.

use serde::{Deserialize, Serialize};

/// Format used when negotiation finds nothing.
pub const DEFAULT_FORMAT: &str = "json";

/// A negotiable format: short name and mime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    pub name: String,
    pub mime: String,
}

impl Format {
    pub fn new(name: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
        }
    }
}

/// Ordered format table. Earlier entries win when several match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTable {
    formats: Vec<Format>,
}

impl Default for FormatTable {
    fn default() -> Self {
        Self {
            formats: vec![
                Format::new("json", "application/json"),
                Format::new("xml", "application/xml"),
            ],
        }
    }
}

impl FormatTable {
    pub fn new(formats: Vec<Format>) -> Self {
        Self { formats }
    }

    /// Add or replace a format.
    pub fn insert(&mut self, name: impl Into<String>, mime: impl Into<String>) {
        let format = Format::new(name, mime);
        match self.formats.iter_mut().find(|f| f.name == format.name) {
            Some(existing) => existing.mime = format.mime,
            None => self.formats.push(format),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.iter().any(|f| f.name == name)
    }

    /// Full mime string for a short format name.
    pub fn mime(&self, name: &str) -> Option<&str> {
        self.formats
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.mime.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Format> {
        self.formats.iter()
    }

    /// Resolve the response format for an `Accept` value.
    ///
    /// A `pinned` format short-circuits negotiation.
    pub fn negotiate(&self, accept: &str, pinned: Option<&str>) -> String {
        if let Some(pinned) = pinned {
            return pinned.to_string();
        }

        self.formats
            .iter()
            .find(|f| accept.contains(f.mime.as_str()))
            .map(|f| f.name.clone())
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string())
    }
}
