//! Validation checks for template entries.
//!
//! Each check takes the resolved entries and returns a `ValidationResult`.
//! Checks only look at what is known before any image is decoded.

use std::collections::HashMap;

use crate::render::mask::{MAX_PRIORITY, MIN_PRIORITY};
use crate::types::{Origin, TemplateEntry};

use super::warning::{Diagnostic, ValidationResult};

/// Warn about entries sharing a name; diagnostics become ambiguous.
pub fn check_duplicate_names(entries: &[TemplateEntry]) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        *seen.entry(entry.name.as_str()).or_default() += 1;
    }

    let mut duplicated: Vec<(&str, usize)> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicated.sort();

    for (name, count) in duplicated {
        result.push(
            Diagnostic::warning(
                "ptasm::validate::duplicate-name",
                format!("{} entries are named '{}'", count, name),
            )
            .about(name)
            .with_help("Give each entry a distinct name so reports can tell them apart"),
        );
    }

    result
}

/// Priorities must fall in the mask's range.
pub fn check_priorities(entries: &[TemplateEntry]) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (i, entry) in entries.iter().enumerate() {
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&entry.priority) {
            result.push(
                Diagnostic::error(
                    "ptasm::validate::priority-range",
                    format!("Entry '{}' has priority {}", entry.name, entry.priority),
                )
                .about(&entry.name)
                .at(i)
                .with_help(format!(
                    "Priority must be between {} and {}",
                    MIN_PRIORITY, MAX_PRIORITY
                )),
            );
        }
    }

    result
}

/// Every entry needs a source, unless it is an exclusion with a forced size.
pub fn check_sources(entries: &[TemplateEntry]) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (i, entry) in entries.iter().enumerate() {
        if !entry.sources.is_empty() {
            continue;
        }
        if entry.exclude && entry.size.is_some() {
            continue;
        }
        result.push(
            Diagnostic::error(
                "ptasm::validate::no-sources",
                format!("Entry '{}' has no image sources", entry.name),
            )
            .about(&entry.name)
            .at(i),
        );
    }

    result
}

/// Negative coordinates only make sense relative to the centre.
pub fn check_coordinates(entries: &[TemplateEntry]) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (i, entry) in entries.iter().enumerate() {
        if entry.origin == Origin::TopLeft && (entry.x < 0 || entry.y < 0) {
            result.push(
                Diagnostic::error(
                    "ptasm::validate::negative-coordinates",
                    format!(
                        "Entry '{}' is at ({}, {}) in top-left coordinates",
                        entry.name, entry.x, entry.y
                    ),
                )
                .about(&entry.name)
                .at(i)
                .with_help("Set \"respects_center\": true for centre-relative coordinates"),
            );
        }
    }

    result
}

/// Group names end up in file names, so they must be non-blank.
pub fn check_group_names(entries: &[TemplateEntry]) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (i, entry) in entries.iter().enumerate() {
        if let Some(group) = &entry.export_group {
            if group.trim().is_empty() {
                result.push(
                    Diagnostic::error(
                        "ptasm::validate::empty-group",
                        format!("Entry '{}' has a blank export group", entry.name),
                    )
                    .about(&entry.name)
                    .at(i)
                    .with_help("Remove \"export_group\" or give it a name"),
                );
            }
        }
    }

    result
}

/// Forced footprints are known up front, so their placement can be checked now.
pub fn check_forced_sizes(
    entries: &[TemplateEntry],
    center_offset: (i64, i64),
    canvas: (u32, u32),
) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (i, entry) in entries.iter().enumerate() {
        let Some((width, height)) = entry.size else {
            continue;
        };

        if !entry.exclude {
            result.push(
                Diagnostic::warning(
                    "ptasm::validate::unused-size",
                    format!("Entry '{}' sets \"size\" but is not excluded", entry.name),
                )
                .about(&entry.name)
                .at(i)
                .with_help("\"size\" only applies to entries with \"exclude\": true"),
            );
            continue;
        }

        if width == 0 || height == 0 {
            result.push(
                Diagnostic::error(
                    "ptasm::validate::empty-size",
                    format!("Entry '{}' has an empty size {}x{}", entry.name, width, height),
                )
                .about(&entry.name)
                .at(i),
            );
            continue;
        }

        if let Err(e) = entry.placement(width, height, center_offset, canvas) {
            result.push(
                Diagnostic::from_error(&entry.name, &e)
                    .at(i)
                    .with_help("The forced footprint must lie inside the canvas"),
            );
        }
    }

    result
}
