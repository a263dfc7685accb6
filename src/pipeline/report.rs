//! Per-run report: what happened to each entry, plus diagnostics.

use std::fmt;

use crate::validation::ValidationResult;

/// What the driver did with one entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Drawn onto the primary canvas (and autopick/mask when `autopick`).
    Rendered {
        autopick: bool,
        lossy: bool,
        max_error: f32,
    },
    /// Not yet enabled; its footprint was erased.
    TimeGated,
    /// Exclusion stamp; its footprint was erased.
    Excluded,
    /// Failed before touching any canvas.
    Skipped,
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryOutcome::Rendered { autopick: true, .. } => write!(f, "rendered (autopick)"),
            EntryOutcome::Rendered { lossy: true, max_error, .. } => {
                write!(f, "rendered (lossy, ΔE {:.1})", max_error)
            }
            EntryOutcome::Rendered { .. } => write!(f, "rendered"),
            EntryOutcome::TimeGated => write!(f, "time-gated"),
            EntryOutcome::Excluded => write!(f, "excluded"),
            EntryOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntryReport {
    pub name: String,
    pub outcome: EntryOutcome,
}

/// Outcomes in declaration order, and every diagnostic raised.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub entries: Vec<EntryReport>,
    pub diagnostics: ValidationResult,
}

impl BuildReport {
    /// Outcome of the first entry named `name`.
    pub fn outcome(&self, name: &str) -> Option<&EntryOutcome> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.outcome)
    }

    pub fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }

    pub fn rendered(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Rendered { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| *o == EntryOutcome::Skipped)
    }
}
