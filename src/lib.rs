//! ptasm - r/place template assembler
//!
//! A library for compositing positioned template images onto shared
//! palette-locked canvases, generating autopick priority masks, and
//! exporting per-faction group crops.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod types;
pub mod validation;

pub use discovery::{discover, discover_paths, Manifest, PaletteSpec, Project, TemplateFile};
pub use error::{AsmError, Result};
pub use pipeline::{
    write_assembly, Assembly, BuildReport, EntryOutcome, EntryReport, Pipeline, PipelineOptions,
};
pub use render::{
    priority_mask, Background, Canvas, ColourMetric, Compositor, EnduInfo, ExportGroups,
    FinishedGroup, GroupDescriptor, PaletteNormalizer,
};
pub use source::{load_first, FsResolver, ImageResolver};
pub use types::{Colour, ExtentBox, Origin, Palette, Rect, TemplateEntry};
pub use validation::{validate_template, Diagnostic, Severity, ValidationResult};
