//! Pipeline driver - runs entries through normalization, masking and
//! compositing in reverse precedence order.
//!
//! Each entry is prepared first (priority check, image load, palette
//! normalization, placement, mask). Only a fully prepared entry is applied
//! to the canvases, so an entry that fails is reported and leaves every
//! canvas untouched.

use image::{Rgba, RgbaImage};

use crate::error::Result;
use crate::render::{
    base_priority, composite, erase, priority_mask, CanvasKind, Compositor, ExportGroups,
    PaletteNormalizer,
};
use crate::source::{load_first, ImageResolver};
use crate::types::{Palette, Rect, TemplateEntry};
use crate::validation::Diagnostic;

use super::report::{BuildReport, EntryOutcome, EntryReport};
use super::{Assembly, PipelineOptions};

/// What an entry does to the canvases once prepared.
enum Action {
    /// Draw `image`; `mask` is present when the entry feeds autopick.
    Draw {
        image: RgbaImage,
        mask: Option<RgbaImage>,
    },
    /// Restore the background under `stencil`.
    Erase { stencil: RgbaImage },
}

struct Prepared {
    action: Action,
    rect: Rect,
    outcome: EntryOutcome,
    warning: Option<Diagnostic>,
}

/// Assembles template entries onto the primary, autopick, mask and
/// export-group canvases.
pub struct Pipeline<'a, R: ImageResolver> {
    palette: &'a Palette,
    resolver: R,
    options: PipelineOptions,
}

impl<'a, R: ImageResolver> Pipeline<'a, R> {
    pub fn new(palette: &'a Palette, resolver: R, options: PipelineOptions) -> Self {
        Self {
            palette,
            resolver,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Run every entry. `entries` is in declaration order, highest precedence first.
    ///
    /// Per-entry failures become error diagnostics in the report. Only
    /// structural failures, such as an unallocatable canvas, return `Err`.
    pub fn run(&mut self, entries: &[TemplateEntry]) -> Result<Assembly> {
        let (width, height) = self.options.canvas;
        let mut compositor = Compositor::new(width, height)?;
        let mut groups = ExportGroups::new(width, height);
        let mut normalizer = PaletteNormalizer::new(self.palette, self.options.metric)
            .with_threshold(self.options.lossy_threshold);
        let mut report = BuildReport::default();
        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries.iter().rev() {
            let outcome = match self.prepare(&mut normalizer, entry) {
                Ok(prepared) => {
                    if let Some(warning) = prepared.warning {
                        report.diagnostics.push(warning);
                    }
                    match apply(&mut compositor, &mut groups, entry, prepared.action, prepared.rect) {
                        Ok(()) => prepared.outcome,
                        Err(e) => {
                            report.diagnostics.push(Diagnostic::from_error(&entry.name, &e));
                            EntryOutcome::Skipped
                        }
                    }
                }
                Err(e) => {
                    report.diagnostics.push(Diagnostic::from_error(&entry.name, &e));
                    EntryOutcome::Skipped
                }
            };
            outcomes.push(EntryReport {
                name: entry.name.clone(),
                outcome,
            });
        }
        outcomes.reverse();
        report.entries = outcomes;

        let mut finished = Vec::with_capacity(groups.len());
        for (name, result) in groups.finish() {
            match result {
                Ok(group) => finished.push(group),
                Err(e) => report.diagnostics.push(Diagnostic::from_error(name, &e)),
            }
        }

        let (primary, autopick, mask) = compositor.into_canvases();
        Ok(Assembly {
            primary,
            autopick,
            mask,
            groups: finished,
            report,
        })
    }

    /// Every fallible step for one entry, with no canvas touched.
    fn prepare(&mut self, normalizer: &mut PaletteNormalizer<'_>, entry: &TemplateEntry) -> Result<Prepared> {
        base_priority(entry.priority)?;
        let offset = self.options.center_offset;
        let canvas = self.options.canvas;

        if entry.exclude {
            let stencil = match entry.size {
                Some((w, h)) => RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255])),
                None => load_first(&mut self.resolver, entry)?,
            };
            let rect = entry.placement(stencil.width(), stencil.height(), offset, canvas)?;
            return Ok(Prepared {
                action: Action::Erase { stencil },
                rect,
                outcome: EntryOutcome::Excluded,
                warning: None,
            });
        }

        let source = load_first(&mut self.resolver, entry)?;
        let normalized = normalizer.normalize(&source);
        let rect = entry.placement(normalized.image.width(), normalized.image.height(), offset, canvas)?;

        if !entry.is_enabled(self.options.now) {
            return Ok(Prepared {
                action: Action::Erase {
                    stencil: normalized.image,
                },
                rect,
                outcome: EntryOutcome::TimeGated,
                warning: None,
            });
        }

        let autopick = entry.autopick && !normalized.lossy;
        let mask = if autopick {
            Some(priority_mask(&normalized.image, entry.priority)?)
        } else {
            None
        };

        let warning = (entry.autopick && normalized.lossy).then(|| {
            Diagnostic::warning(
                "ptasm::normalize::lossy",
                format!(
                    "Entry '{}' needed a ΔE {:.1} correction ({} pixels changed)",
                    entry.name, normalized.max_error, normalized.corrected
                ),
            )
            .about(&entry.name)
            .with_help("Kept off the autopick and mask canvases; redraw it in palette colours")
        });

        Ok(Prepared {
            action: Action::Draw {
                image: normalized.image,
                mask,
            },
            rect,
            outcome: EntryOutcome::Rendered {
                autopick,
                lossy: normalized.lossy,
                max_error: normalized.max_error,
            },
            warning,
        })
    }
}

/// Apply a prepared entry to the fixed canvases and its export group.
fn apply(
    compositor: &mut Compositor,
    groups: &mut ExportGroups,
    entry: &TemplateEntry,
    action: Action,
    rect: Rect,
) -> Result<()> {
    match action {
        Action::Draw { image, mask } => {
            compositor.composite(CanvasKind::Primary, &image, rect)?;
            match &mask {
                Some(mask) => {
                    compositor.composite(CanvasKind::Autopick, &image, rect)?;
                    compositor.composite(CanvasKind::Mask, mask, rect)?;
                }
                None => {
                    compositor.erase(CanvasKind::Autopick, &image, rect)?;
                    compositor.erase(CanvasKind::Mask, &image, rect)?;
                }
            }

            if let Some(name) = &entry.export_group {
                let group = groups.get_or_create(name)?;
                composite(&mut group.canvas, &image, rect)?;
                group.extents.update(rect);
            }
        }
        Action::Erase { stencil } => {
            compositor.erase_all(&stencil, rect)?;

            // Erasing never creates a group.
            if let Some(group) = entry.export_group.as_deref().and_then(|n| groups.get_mut(n)) {
                erase(&mut group.canvas, &stencil, rect)?;
            }
        }
    }
    Ok(())
}
