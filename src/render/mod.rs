//! Rendering module for ptasm.
//!
//! Palette normalization, priority masks, canvas compositing, export
//! groups, and the writers that persist the results.

mod canvas;
mod compositor;
mod endu;
mod group;
pub mod mask;
mod normalize;
mod png;

pub use canvas::{Background, Canvas};
pub use compositor::{composite, erase, CanvasKind, Compositor};
pub use endu::{endu_document, write_endu_json, EnduInfo, EnduTemplate, GroupDescriptor};
pub use group::{finalize_group, ExportGroup, ExportGroups, FinishedGroup};
pub use mask::{base_priority, priority_mask, BoundaryMap, Cell};
pub use normalize::{
    redmean_distance, ColourMetric, Normalized, PaletteNormalizer, DEFAULT_LOSSY_THRESHOLD,
};
pub use png::{group_file_name, write_png};
