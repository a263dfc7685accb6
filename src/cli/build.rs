//! Build command implementation.
//!
//! Loads each discovered template, runs the assembly pipeline, and writes
//! the canvases, group crops and endu template.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{discover_paths, Project};
use crate::error::{AsmError, Result};
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{write_assembly, EntryOutcome, Pipeline};
use crate::types::TemplateEntry;
use crate::validation::{validate_template, ValidationResult};

/// Assemble canvases from template files
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Template files or directories to build
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Output directory (overrides ptasm.yaml)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Unix time used for `enabled_utc` gating (default: now)
    #[arg(long)]
    pub now: Option<i64>,

    /// Fail if any entry was skipped
    #[arg(long)]
    pub strict: bool,
}

/// Totals across every template in one invocation.
#[derive(Debug, Default)]
struct Totals {
    templates: usize,
    files: usize,
    skipped: usize,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let templates = discover_paths(&args.paths)?;
    if templates.is_empty() {
        return Err(AsmError::Build {
            message: "No template.json found".to_string(),
            help: Some("Pass a template file or a directory containing one".to_string()),
        });
    }

    let now = args.now.unwrap_or_else(super::unix_now);
    let many = templates.len() > 1;
    let mut totals = Totals::default();

    for path in &templates {
        let project = Project::load(path)?;
        let output = match &args.output {
            Some(dir) if many => dir.join(project_label(&project)),
            Some(dir) => dir.clone(),
            None => project.output_dir(),
        };
        build_project(&project, &output, now, printer, &mut totals)?;
    }

    printer.status(
        "Finished",
        &format!(
            "{} from {}",
            plural(totals.files, "file", "files"),
            plural(totals.templates, "template", "templates")
        ),
    );

    if args.strict && totals.skipped > 0 {
        return Err(AsmError::Build {
            message: format!("{} skipped", plural(totals.skipped, "entry was", "entries were")),
            help: Some("Fix the errors above or drop --strict".to_string()),
        });
    }

    Ok(())
}

fn build_project(
    project: &Project,
    output: &Path,
    now: i64,
    printer: &Printer,
    totals: &mut Totals,
) -> Result<()> {
    let palette = project.palette()?;
    let options = project.options(now)?;

    let (entries, mut diagnostics) = project.template.resolve();
    let declared = project.template.templates.len();
    let validation = validate_template(&entries, &options);
    let entries = drop_rejected(entries, &validation);
    diagnostics.merge(validation);

    printer.status(
        "Assembling",
        &format!(
            "{} ({}, {}x{})",
            display_path(&project.template_path),
            plural(entries.len(), "entry", "entries"),
            options.canvas.0,
            options.canvas.1
        ),
    );

    let mut pipeline = Pipeline::new(&palette, project.resolver(), options);
    let assembly = pipeline.run(&entries)?;

    for entry in &assembly.report.entries {
        match &entry.outcome {
            EntryOutcome::TimeGated => printer.info("Gated", &entry.name),
            EntryOutcome::Excluded => printer.info("Excluded", &entry.name),
            _ => {}
        }
    }

    diagnostics.merge(assembly.report.diagnostics.clone());
    printer.diagnostics(&diagnostics);

    let written = write_assembly(&assembly, &project.template.endu_info, output)?;
    printer.status(
        "Wrote",
        &format!(
            "{} and {} to {}",
            plural(written.canvases.len(), "canvas", "canvases"),
            plural(written.groups.len(), "group", "groups"),
            printer.cyan(&display_path(output))
        ),
    );

    // Rejected before the run or skipped during it.
    let skipped = declared - assembly.report.count(|o| *o != EntryOutcome::Skipped);
    if skipped > 0 {
        printer.warning("Skipped", &plural(skipped, "entry", "entries"));
    }

    totals.templates += 1;
    totals.files += written.len();
    totals.skipped += skipped;
    Ok(())
}

/// Leave out entries that failed validation; the pipeline would only fail them again.
///
/// Entries are matched by position, since names need not be unique.
fn drop_rejected(entries: Vec<TemplateEntry>, validation: &ValidationResult) -> Vec<TemplateEntry> {
    let rejected = validation.rejected_entries();

    entries
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !rejected.contains(i))
        .map(|(_, e)| e)
        .collect()
}

/// Directory name used to keep several templates' outputs apart.
fn project_label(project: &Project) -> String {
    project
        .root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("template")
        .to_string()
}
