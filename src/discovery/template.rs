//! `template.json` parsing.
//!
//! The document is an ordered list of entry descriptors, highest
//! precedence first. Descriptors are parsed leniently and resolved one by
//! one, so a single malformed entry is reported and skipped rather than
//! failing the whole document.

use std::path::Path;

use serde::Deserialize;

use crate::error::{AsmError, Result};
use crate::render::EnduInfo;
use crate::types::{Origin, TemplateEntry};
use crate::validation::{Diagnostic, ValidationResult};

/// A parsed `template.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateFile {
    #[serde(default)]
    pub endu_info: EnduInfo,

    #[serde(default)]
    pub templates: Vec<EntryDef>,
}

/// One raw entry descriptor. Required fields are checked in [`EntryDef::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntryDef {
    pub name: Option<String>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    #[serde(alias = "sources")]
    pub images: Vec<String>,
    #[serde(alias = "bots")]
    pub autopick: bool,
    pub priority: Option<i64>,
    pub export_group: Option<String>,
    pub enabled_utc: Option<i64>,
    pub exclude: bool,
    pub size: Option<[u32; 2]>,
    pub respects_center: bool,
}

impl EntryDef {
    /// Label for diagnostics: the name, or the position in the list.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("templates[{}]", index),
        }
    }

    /// Check required fields and build a [`TemplateEntry`].
    pub fn resolve(&self, index: usize) -> Result<TemplateEntry> {
        let label = self.label(index);
        let missing = |field: &str| AsmError::Config {
            message: format!("Entry '{}' is missing \"{}\"", label, field),
            help: None,
        };

        let name = self.name.clone().ok_or_else(|| missing("name"))?;
        let x = self.x.ok_or_else(|| missing("x"))?;
        let y = self.y.ok_or_else(|| missing("y"))?;

        let forced = self.exclude && self.size.is_some();
        if self.images.is_empty() && !forced {
            return Err(AsmError::Config {
                message: format!("Entry '{}' has no images", label),
                help: Some("Excluded entries may give \"size\": [w, h] instead".to_string()),
            });
        }

        Ok(TemplateEntry {
            name,
            x,
            y,
            origin: if self.respects_center {
                Origin::Center
            } else {
                Origin::TopLeft
            },
            sources: self.images.clone(),
            autopick: self.autopick,
            priority: self.priority.unwrap_or(TemplateEntry::DEFAULT_PRIORITY),
            export_group: self.export_group.clone(),
            enabled_utc: self.enabled_utc,
            exclude: self.exclude,
            size: self.size.map(|[w, h]| (w, h)),
        })
    }
}

impl TemplateFile {
    /// Load a template from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AsmError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read template: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse a template from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| AsmError::Parse {
            message: format!("Invalid template: {}", e),
            help: Some("Check template.json syntax".to_string()),
        })
    }

    /// Resolve every descriptor, in declaration order.
    ///
    /// Descriptors that fail to resolve are left out and reported.
    pub fn resolve(&self) -> (Vec<TemplateEntry>, ValidationResult) {
        let mut entries = Vec::with_capacity(self.templates.len());
        let mut report = ValidationResult::new();

        for (index, def) in self.templates.iter().enumerate() {
            match def.resolve(index) {
                Ok(entry) => entries.push(entry),
                Err(e) => report.push(Diagnostic::from_error(def.label(index), &e)),
            }
        }

        (entries, report)
    }
}
