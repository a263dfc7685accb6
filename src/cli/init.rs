//! Init command implementation.
//!
//! Generates a `ptasm.yaml` manifest, and a starter `template.json` when
//! the directory holds no templates yet.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::discovery::{scan_directory, Manifest, MANIFEST_FILENAME, TEMPLATE_FILENAME};
use crate::error::{AsmError, Result};
use crate::output::{display_path, plural, Printer};
use crate::types::BUILTIN_PALETTES;

const STARTER_TEMPLATE: &str = r#"{
  "endu_info": {
    "name": null,
    "contact": null,
    "source_root": null
  },
  "templates": []
}
"#;

/// Initialize a ptasm project by generating a ptasm.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing ptasm.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(AsmError::Build {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let templates = scan_directory(&args.path, &Manifest::default());

    fs::write(&manifest_path, manifest_yaml(&Manifest::default())).map_err(|e| AsmError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    if templates.is_empty() {
        let template_path = args.path.join(TEMPLATE_FILENAME);
        fs::write(&template_path, STARTER_TEMPLATE).map_err(|e| AsmError::Io {
            path: template_path.clone(),
            message: format!("Failed to write template: {}", e),
        })?;
        printer.status("Created", &display_path(&template_path));
    }

    printer.status(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            plural(templates.len(), "template", "templates")
        ),
    );

    Ok(())
}

/// Render the manifest by hand for clean, commented output.
fn manifest_yaml(manifest: &Manifest) -> String {
    let mut yaml = String::new();
    yaml.push_str(&format!(
        "canvas: [{}, {}]\n",
        manifest.canvas[0], manifest.canvas[1]
    ));
    yaml.push_str(&format!("# builtin: {}, or a list of hex colours\n", BUILTIN_PALETTES.join(", ")));
    yaml.push_str(&format!("palette: {}\n", BUILTIN_PALETTES[0]));
    yaml.push_str(&format!("output: {}\n", manifest.output.display()));
    yaml.push_str("# added to entries with \"respects_center\": true\n");
    yaml.push_str(&format!(
        "center_offset: [{}, {}]\n",
        manifest.center_offset[0], manifest.center_offset[1]
    ));
    yaml.push_str(&format!("metric: {}\n", manifest.metric));
    yaml.push_str(&format!("lossy_threshold: {:.1}\n", manifest.lossy_threshold));
    yaml
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_manifest_and_template() {
        let dir = tempdir().unwrap();
        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };

        run(args, &Printer::plain()).unwrap();

        let content = fs::read_to_string(dir.path().join(MANIFEST_FILENAME)).unwrap();
        assert!(content.contains("output: dist"));
        assert!(dir.path().join(TEMPLATE_FILENAME).exists());
    }

    #[test]
    fn test_generated_manifest_round_trips() {
        let yaml = manifest_yaml(&Manifest::default());
        let parsed = Manifest::parse(&yaml).unwrap();
        assert_eq!(parsed.options(0).unwrap(), Manifest::default().options(0).unwrap());
        assert_eq!(parsed.palette, Manifest::default().palette);
    }

    #[test]
    fn test_starter_template_parses() {
        let template = crate::discovery::TemplateFile::parse(STARTER_TEMPLATE).unwrap();
        assert!(template.templates.is_empty());
    }

    #[test]
    fn test_init_keeps_existing_templates() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("mlp")).unwrap();
        fs::write(dir.path().join("mlp/template.json"), "{}").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        run(args, &Printer::plain()).unwrap();
        assert!(!dir.path().join(TEMPLATE_FILENAME).exists());
    }

    #[test]
    fn test_init_errors_if_manifest_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "output: build").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        assert!(run(args, &Printer::plain()).is_err());
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "output: build").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: true,
        };
        run(args, &Printer::plain()).unwrap();

        let content = fs::read_to_string(dir.path().join(MANIFEST_FILENAME)).unwrap();
        assert!(content.contains("output: dist"));
    }
}
