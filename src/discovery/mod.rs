//! Project discovery for ptasm.
//!
//! A project is a `template.json` plus the nearest `ptasm.yaml` found in
//! its directory or any ancestor. Without a manifest, defaults apply.
//!
//! # Example
//!
//! ```ignore
//! use ptasm::discovery::{discover, Project};
//!
//! for path in discover("./factions")? {
//!     let project = Project::load(&path)?;
//!     println!("{}: {} entries", path.display(), project.template.templates.len());
//! }
//! ```

mod manifest;
mod scanner;
mod template;

use std::path::{Path, PathBuf};

use crate::error::{AsmError, Result};
use crate::pipeline::PipelineOptions;
use crate::source::FsResolver;
use crate::types::Palette;

pub use manifest::{Manifest, PaletteSpec};
pub use scanner::scan_directory;
pub use template::{EntryDef, TemplateFile};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "ptasm.yaml";

/// The name of the template file.
pub const TEMPLATE_FILENAME: &str = "template.json";

/// A loaded template and the manifest governing it.
#[derive(Debug)]
pub struct Project {
    /// Directory holding the template; sources resolve against it.
    pub root: PathBuf,

    pub template_path: PathBuf,

    pub template: TemplateFile,

    /// The loaded manifest (default if no ptasm.yaml was found).
    pub manifest: Manifest,

    /// Where the manifest came from, if anywhere.
    pub manifest_path: Option<PathBuf>,
}

impl Project {
    /// Load a project from a template file or a directory containing one.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let template_path = if path.is_dir() {
            path.join(TEMPLATE_FILENAME)
        } else {
            path.to_path_buf()
        };

        if !template_path.is_file() {
            return Err(AsmError::Io {
                path: template_path,
                message: "No template found".to_string(),
            });
        }

        let root = template_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let manifest_path = find_manifest(&root);
        let manifest = match &manifest_path {
            Some(p) => Manifest::load(p)?,
            None => Manifest::default(),
        };
        let template = TemplateFile::load(&template_path)?;

        Ok(Self {
            root,
            template_path,
            template,
            manifest,
            manifest_path,
        })
    }

    pub fn has_manifest(&self) -> bool {
        self.manifest_path.is_some()
    }

    pub fn palette(&self) -> Result<Palette> {
        self.manifest.palette()
    }

    pub fn options(&self, now: i64) -> Result<PipelineOptions> {
        self.manifest.options(now)
    }

    /// Resolver reading sources relative to the template's directory.
    pub fn resolver(&self) -> FsResolver {
        FsResolver::new(&self.root)
    }

    /// Output directory, relative paths resolved against the project root.
    pub fn output_dir(&self) -> PathBuf {
        if self.manifest.output.is_absolute() {
            self.manifest.output.clone()
        } else {
            self.root.join(&self.manifest.output)
        }
    }
}

/// Nearest ptasm.yaml in `dir` or its ancestors.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|d| d.join(MANIFEST_FILENAME))
        .find(|p| p.is_file())
}

/// Find template files under `path`.
///
/// A file is taken as-is. A directory holding a `template.json` yields
/// just that file; otherwise the directory is scanned recursively, using
/// the excludes of its manifest if it has one.
pub fn discover(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(AsmError::Io {
            path: path.to_path_buf(),
            message: "No such file or directory".to_string(),
        });
    }

    let direct = path.join(TEMPLATE_FILENAME);
    if direct.is_file() {
        return Ok(vec![direct]);
    }

    let manifest_path = path.join(MANIFEST_FILENAME);
    let manifest = if manifest_path.is_file() {
        Manifest::load(&manifest_path)?
    } else {
        Manifest::default()
    };

    Ok(scan_directory(path, &manifest))
}

/// Discover across several paths, dropping duplicates but keeping order.
pub fn discover_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found: Vec<PathBuf> = Vec::new();
    for path in paths {
        for template in discover(path)? {
            if !found.contains(&template) {
                found.push(template);
            }
        }
    }
    Ok(found)
}
