//! Validation system for ptasm templates.
//!
//! Runs a suite of checks against resolved template entries and reports
//! errors and warnings. Used by both `ptasm validate` and `ptasm build`.

mod checks;
mod warning;

pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::pipeline::PipelineOptions;
use crate::types::TemplateEntry;

/// Run all validation checks against the entries.
pub fn validate_template(entries: &[TemplateEntry], options: &PipelineOptions) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_duplicate_names(entries));
    result.merge(checks::check_sources(entries));
    result.merge(checks::check_priorities(entries));
    result.merge(checks::check_coordinates(entries));
    result.merge(checks::check_group_names(entries));
    result.merge(checks::check_forced_sizes(
        entries,
        options.center_offset,
        options.canvas,
    ));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Origin;

    fn options() -> PipelineOptions {
        PipelineOptions {
            canvas: (100, 100),
            center_offset: (50, 50),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_empty_template() {
        let result = validate_template(&[], &options());
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_valid_entries() {
        let entries = vec![
            TemplateEntry::new("a", 0, 0).with_source("a.png").with_priority(10),
            TemplateEntry::new("b", -10, -5)
                .with_source("b.png")
                .with_origin(Origin::Center)
                .with_group("starter"),
            TemplateEntry::new("blank", 90, 90).excluded(Some((10, 10))),
        ];
        let result = validate_template(&entries, &options());
        assert!(result.is_ok(), "{:?}", result);
    }

    #[test]
    fn test_validate_catches_priority_and_coordinates() {
        let entries = vec![
            TemplateEntry::new("loud", 0, 0).with_source("a.png").with_priority(11),
            TemplateEntry::new("neg", -1, 3).with_source("a.png"),
        ];
        let result = validate_template(&entries, &options());

        assert_eq!(result.error_count(), 2);
        assert!(result
            .about("loud")
            .any(|d| d.code == "ptasm::validate::priority-range"));
        assert!(result
            .about("neg")
            .any(|d| d.code == "ptasm::validate::negative-coordinates"));
    }

    #[test]
    fn test_validate_duplicates_are_warnings() {
        let entries = vec![
            TemplateEntry::new("twin", 0, 0).with_source("a.png"),
            TemplateEntry::new("twin", 5, 5).with_source("b.png"),
        ];
        let result = validate_template(&entries, &options());
        assert!(!result.has_errors());
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_validate_sources_and_groups() {
        let entries = vec![
            TemplateEntry::new("nothing", 0, 0),
            TemplateEntry::new("blank-group", 0, 0).with_source("a.png").with_group(" "),
        ];
        let result = validate_template(&entries, &options());
        assert!(result.about("nothing").any(|d| d.code == "ptasm::validate::no-sources"));
        assert!(result.about("blank-group").any(|d| d.code == "ptasm::validate::empty-group"));
    }

    #[test]
    fn test_validate_forced_size_outside_canvas() {
        let mut sized = TemplateEntry::new("sized", 0, 0).with_source("a.png");
        sized.size = Some((2, 2));

        let entries = vec![
            TemplateEntry::new("spill", 95, 0).excluded(Some((10, 10))),
            TemplateEntry::new("flat", 0, 0).excluded(Some((0, 3))),
            TemplateEntry::new("stray", 0, 0).with_source("a.png").excluded(None),
            sized,
        ];

        let result = validate_template(&entries, &options());
        assert_eq!(result.about("spill").count(), 1);
        assert!(result.about("flat").any(|d| d.code == "ptasm::validate::empty-size"));
        assert!(result.about("sized").any(|d| d.code == "ptasm::validate::unused-size"));
        assert_eq!(result.about("stray").count(), 0);
    }
}
