//! Validate command implementation.
//!
//! Parses templates and runs the static checks without decoding any image.

use std::path::PathBuf;

use clap::Args;

use crate::discovery::{discover_paths, Project};
use crate::error::{AsmError, Result};
use crate::output::{display_path, plural, Printer};
use crate::validation::{validate_template, ValidationResult};

/// Check template files without loading images
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Template files or directories to validate
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub deny_warnings: bool,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    let templates = discover_paths(&args.paths)?;
    let mut all = ValidationResult::new();

    for path in &templates {
        let result = validate_project(&Project::load(path)?)?;
        printer.status(
            "Checked",
            &format!(
                "{} ({})",
                display_path(path),
                plural(result.iter().count(), "diagnostic", "diagnostics")
            ),
        );
        printer.diagnostics(&result);
        all.merge(result);
    }

    let errors = all.error_count();
    let warnings = all.warning_count();
    let failed = errors > 0 || (args.deny_warnings && warnings > 0);

    if failed {
        return Err(AsmError::Build {
            message: format!(
                "Validation failed: {}, {}",
                plural(errors, "error", "errors"),
                plural(warnings, "warning", "warnings")
            ),
            help: None,
        });
    }

    printer.status(
        "Validated",
        &format!(
            "{} ({})",
            plural(templates.len(), "template", "templates"),
            plural(warnings, "warning", "warnings")
        ),
    );
    Ok(())
}

/// Resolve and check one project's entries and manifest.
pub fn validate_project(project: &Project) -> Result<ValidationResult> {
    project.palette()?;
    let options = project.options(0)?;

    let (entries, mut result) = project.template.resolve();
    result.merge(validate_template(&entries, &options));
    Ok(result)
}
