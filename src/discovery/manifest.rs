//! Project manifest (ptasm.yaml) parsing.
//!
//! The manifest sets the canvas geometry, palette, colour metric and
//! output location shared by every template under it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AsmError, Result};
use crate::pipeline::{PipelineOptions, DEFAULT_CANVAS, DEFAULT_CENTER_OFFSET};
use crate::render::{ColourMetric, DEFAULT_LOSSY_THRESHOLD};
use crate::types::{Palette, BUILTIN_PALETTES};

/// A builtin palette name or an explicit list of hex colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteSpec {
    Named(String),
    Colours(Vec<String>),
}

impl Default for PaletteSpec {
    fn default() -> Self {
        PaletteSpec::Named(BUILTIN_PALETTES[0].to_string())
    }
}

impl PaletteSpec {
    pub fn resolve(&self) -> Result<Palette> {
        match self {
            PaletteSpec::Named(name) => Palette::builtin(name).ok_or_else(|| AsmError::Config {
                message: format!("Unknown palette '{}'", name),
                help: Some(format!(
                    "Use one of: {}, or list hex colours",
                    BUILTIN_PALETTES.join(", ")
                )),
            }),
            PaletteSpec::Colours(hexes) => Palette::from_hex("custom", hexes.as_slice()),
        }
    }
}

/// Project manifest loaded from ptasm.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Canvas width and height.
    pub canvas: [u32; 2],

    pub palette: PaletteSpec,

    /// Output directory, relative to each template's directory.
    pub output: PathBuf,

    /// Added to the coordinates of centre-origin entries.
    pub center_offset: [i64; 2],

    pub metric: ColourMetric,

    /// Correction distance above which an entry is kept off autopick.
    pub lossy_threshold: f32,

    /// Patterns to skip while scanning for templates.
    pub excludes: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            canvas: [DEFAULT_CANVAS.0, DEFAULT_CANVAS.1],
            palette: PaletteSpec::default(),
            output: PathBuf::from("dist"),
            center_offset: [DEFAULT_CENTER_OFFSET.0, DEFAULT_CENTER_OFFSET.1],
            metric: ColourMetric::default(),
            lossy_threshold: DEFAULT_LOSSY_THRESHOLD,
            excludes: vec![],
        }
    }
}

impl Manifest {
    /// Load manifest from a ptasm.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AsmError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string. An empty document means all defaults.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| AsmError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check ptasm.yaml syntax".to_string()),
        })
    }

    pub fn palette(&self) -> Result<Palette> {
        self.palette.resolve()
    }

    /// Pipeline options for a run at unix time `now`.
    pub fn options(&self, now: i64) -> Result<PipelineOptions> {
        if !self.lossy_threshold.is_finite() || self.lossy_threshold < 0.0 {
            return Err(AsmError::Config {
                message: format!("lossy_threshold must be a non-negative number, got {}", self.lossy_threshold),
                help: Some(format!("The default is {}", DEFAULT_LOSSY_THRESHOLD)),
            });
        }

        Ok(PipelineOptions {
            canvas: (self.canvas[0], self.canvas[1]),
            center_offset: (self.center_offset[0], self.center_offset[1]),
            metric: self.metric,
            lossy_threshold: self.lossy_threshold,
            now,
        })
    }

    /// Check if a path should be skipped based on `excludes`.
    ///
    /// Patterns are `*.ext`, `dir/*`, `**/dir/*`, or a plain substring.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.excludes.iter().any(|p| matches_pattern(&path, p))
    }
}

fn matches_pattern(path: &str, pattern: &str) -> bool {
    let inside = |dir: &str| path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));

    if let Some(rest) = pattern.strip_prefix("**/") {
        return match rest.strip_suffix("/*") {
            Some(dir) => inside(dir),
            None => path.ends_with(rest) || path.contains(rest),
        };
    }
    if let Some(ext) = pattern.strip_prefix('*') {
        if !ext.contains('/') {
            return path.ends_with(ext);
        }
    }
    if let Some(dir) = pattern.strip_suffix("/*") {
        return inside(dir);
    }
    path.contains(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = Manifest::parse("output: build").unwrap();

        assert_eq!(manifest.output, PathBuf::from("build"));
        assert_eq!(manifest.canvas, [2000, 2000]);
        assert_eq!(manifest.palette, PaletteSpec::default());
        assert!(manifest.excludes.is_empty());
    }

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r##"
canvas: [3000, 2000]
palette: mono
output: out/place
center_offset: [1500, 1000]
metric: redmean
lossy_threshold: 12.5
excludes:
  - "**/archive/*"
"##;
        let manifest = Manifest::parse(yaml).unwrap();

        assert_eq!(manifest.canvas, [3000, 2000]);
        assert_eq!(manifest.palette, PaletteSpec::Named("mono".to_string()));
        assert_eq!(manifest.output, PathBuf::from("out/place"));
        assert_eq!(manifest.metric, ColourMetric::Redmean);

        let options = manifest.options(42).unwrap();
        assert_eq!(options.canvas, (3000, 2000));
        assert_eq!(options.center_offset, (1500, 1000));
        assert_eq!(options.lossy_threshold, 12.5);
        assert_eq!(options.now, 42);
    }

    #[test]
    fn test_palette_list() {
        let yaml = "palette:\n  - \"#000000\"\n  - \"#FF4500\"\n";
        let manifest = Manifest::parse(yaml).unwrap();
        let palette = manifest.palette().unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.name, "custom");
    }

    #[test]
    fn test_unknown_palette_is_config_error() {
        let manifest = Manifest::parse("palette: neon").unwrap();
        let err = manifest.palette().unwrap_err();
        assert!(matches!(err, AsmError::Config { .. }));
        assert!(err.help_text().unwrap().contains("place-2023"));
    }

    #[test]
    fn test_default_manifest() {
        let manifest = Manifest::default();
        let options = manifest.options(0).unwrap();
        assert_eq!(options, PipelineOptions::default());
        assert_eq!(manifest.palette().unwrap().len(), 32);
    }

    #[test]
    fn test_bad_threshold() {
        let manifest = Manifest {
            lossy_threshold: -1.0,
            ..Default::default()
        };
        assert!(manifest.options(0).is_err());
    }

    #[test]
    fn test_is_excluded() {
        let manifest = Manifest {
            excludes: vec!["*.bak".to_string(), "**/archive/*".to_string(), "old/*".to_string()],
            ..Default::default()
        };

        assert!(manifest.is_excluded(Path::new("mlp/template.json.bak")));
        assert!(manifest.is_excluded(Path::new("art/archive/template.json")));
        assert!(manifest.is_excluded(Path::new("old/template.json")));
        assert!(!manifest.is_excluded(Path::new("mlp/template.json")));
    }

    #[test]
    fn test_parse_empty_manifest() {
        let manifest = Manifest::parse("").unwrap();
        assert_eq!(manifest.output, PathBuf::from("dist"));
    }

    #[test]
    fn test_malformed_manifest() {
        let err = Manifest::parse("canvas: [1, 2, 3]").unwrap_err();
        assert!(matches!(err, AsmError::Parse { .. }));
    }
}
