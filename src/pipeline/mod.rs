//! Assembly pipeline.
//!
//! Drives template entries through palette normalization, priority masks
//! and ordered compositing, and hands the finished canvases to the writers.

mod driver;
mod report;
mod write;

pub use driver::Pipeline;
pub use report::{BuildReport, EntryOutcome, EntryReport};
pub use write::{write_assembly, WrittenFiles, ENDU_FILENAME};

use crate::render::{Canvas, ColourMetric, FinishedGroup, DEFAULT_LOSSY_THRESHOLD};

/// Default canvas size, matching the 2023 r/place canvas.
pub const DEFAULT_CANVAS: (u32, u32) = (2000, 2000);

/// Default offset added to centre-origin coordinates.
pub const DEFAULT_CENTER_OFFSET: (i64, i64) = (1000, 1000);

/// Knobs for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub canvas: (u32, u32),
    pub center_offset: (i64, i64),
    pub metric: ColourMetric,
    pub lossy_threshold: f32,
    /// Unix time used for `enabled_utc` gating.
    pub now: i64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            canvas: DEFAULT_CANVAS,
            center_offset: DEFAULT_CENTER_OFFSET,
            metric: ColourMetric::default(),
            lossy_threshold: DEFAULT_LOSSY_THRESHOLD,
            now: 0,
        }
    }
}

/// Everything one run produced.
#[derive(Debug)]
pub struct Assembly {
    pub primary: Canvas,
    pub autopick: Canvas,
    pub mask: Canvas,
    /// Cropped groups in declaration order.
    pub groups: Vec<FinishedGroup>,
    pub report: BuildReport,
}

impl Assembly {
    /// The three fixed canvases, in output order.
    pub fn canvases(&self) -> [&Canvas; 3] {
        [&self.primary, &self.autopick, &self.mask]
    }
}
