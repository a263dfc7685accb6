//! Export groups - per-group canvases, extents, and cropped exports.

use std::collections::HashMap;

use image::RgbaImage;

use crate::error::{AsmError, Result};
use crate::types::{ExtentBox, Rect};

use super::canvas::{Background, Canvas};

/// A named subset of entries composited onto its own canvas.
#[derive(Debug, Clone)]
pub struct ExportGroup {
    pub name: String,
    pub canvas: Canvas,
    pub extents: ExtentBox,
}

/// A group cropped to its extents, ready for a writer.
#[derive(Debug, Clone)]
pub struct FinishedGroup {
    pub name: String,
    pub image: RgbaImage,
    /// Top-left of the crop in canvas coordinates.
    pub x: u32,
    pub y: u32,
}

/// Groups keyed by name, remembering creation order.
#[derive(Debug)]
pub struct ExportGroups {
    width: u32,
    height: u32,
    groups: Vec<ExportGroup>,
    index: HashMap<String, usize>,
}

impl ExportGroups {
    /// Create an empty collection whose canvases will be `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Get a group, creating a transparent canvas and empty extents on first use.
    pub fn get_or_create(&mut self, name: &str) -> Result<&mut ExportGroup> {
        let idx = match self.index.get(name).copied() {
            Some(idx) => idx,
            None => {
                let canvas = Canvas::new(
                    format!("endu-{}", name),
                    self.width,
                    self.height,
                    Background::Transparent,
                )?;
                self.groups.push(ExportGroup {
                    name: name.to_string(),
                    canvas,
                    extents: ExtentBox::new(),
                });
                self.index.insert(name.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        Ok(&mut self.groups[idx])
    }

    /// Get an existing group without creating it.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ExportGroup> {
        let idx = *self.index.get(name)?;
        self.groups.get_mut(idx)
    }

    pub fn get(&self, name: &str) -> Option<&ExportGroup> {
        self.index.get(name).map(|&idx| &self.groups[idx])
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Names in creation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Crop every group, emitting them in reverse creation order.
    ///
    /// Groups are created during the reverse-precedence render pass, so
    /// reversing again yields declaration order. A group that fails to
    /// finalize is returned as an error beside the successful ones.
    pub fn finish(self) -> Vec<(String, Result<FinishedGroup>)> {
        self.groups
            .into_iter()
            .rev()
            .map(|group| (group.name.clone(), finalize_group(group)))
            .collect()
    }
}

/// Validate a group's extents against its canvas and crop to them.
pub fn finalize_group(group: ExportGroup) -> Result<FinishedGroup> {
    let (width, height) = group.canvas.size();

    let Some(rect) = group.extents.rect() else {
        return Err(AsmError::Config {
            message: format!("Export group '{}' has no extents", group.name),
            help: None,
        });
    };

    if !group.extents.fits_within(width, height) {
        return Err(AsmError::Config {
            message: format!(
                "Export group '{}': extents exceed canvas ({}..{}, {}..{} on {}x{})",
                group.name,
                rect.x,
                rect.right(),
                rect.y,
                rect.bottom(),
                width,
                height
            ),
            help: None,
        });
    }

    Ok(FinishedGroup {
        image: group.canvas.crop(&rect),
        name: group.name,
        x: rect.x,
        y: rect.y,
    })
}

impl FinishedGroup {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.image.width(), self.image.height())
    }
}
