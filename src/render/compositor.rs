//! Canvas compositor - ordered alpha composition and stencil erasure.
//!
//! Entries are painted with "source over" blending, so later entries win
//! where they are opaque. Erasing pastes the canvas background through an
//! image's own transparency stencil: only the pixels that image would have
//! drawn are cleared, everything else on the canvas is left alone.

use image::{Rgba, RgbaImage};

use crate::error::{AsmError, Result};
use crate::types::{Colour, Rect};

use super::canvas::{Background, Canvas};

/// Alpha-blend `image` onto `canvas` with its top-left at `rect`.
///
/// `rect` must match the image size and lie inside the canvas.
pub fn composite(canvas: &mut Canvas, image: &RgbaImage, rect: Rect) -> Result<()> {
    check_fit(canvas, image, rect)?;

    let target = canvas.image_mut();
    for (sx, sy, src) in image.enumerate_pixels() {
        if src[3] == 0 {
            continue;
        }
        let (dx, dy) = (rect.x + sx, rect.y + sy);
        let blended = source_over(src, target.get_pixel(dx, dy));
        target.put_pixel(dx, dy, blended);
    }
    Ok(())
}

/// Restore the canvas background wherever `stencil` is drawn.
///
/// On mask-style canvases the background is an opaque sentinel, so the
/// erased footprint reads as masked out rather than empty.
pub fn erase(canvas: &mut Canvas, stencil: &RgbaImage, rect: Rect) -> Result<()> {
    check_fit(canvas, stencil, rect)?;

    let blank: Rgba<u8> = canvas.background().colour().into();
    let target = canvas.image_mut();
    for (sx, sy, px) in stencil.enumerate_pixels() {
        if Colour::from(*px).is_visible() {
            target.put_pixel(rect.x + sx, rect.y + sy, blank);
        }
    }
    Ok(())
}

/// Porter-Duff "source over".
fn source_over(src: &Rgba<u8>, dst: &Rgba<u8>) -> Rgba<u8> {
    if src[3] == 255 {
        return *src;
    }

    let src_alpha = src[3] as f32 / 255.0;
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);

    if out_alpha == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let out = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (out.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

fn check_fit(canvas: &Canvas, image: &RgbaImage, rect: Rect) -> Result<()> {
    if image.dimensions() != (rect.width, rect.height) {
        return Err(AsmError::Build {
            message: format!(
                "Image is {}x{} but its placement is {}x{}",
                image.width(),
                image.height(),
                rect.width,
                rect.height
            ),
            help: None,
        });
    }
    if !canvas.contains_rect(&rect) {
        return Err(AsmError::Config {
            message: format!(
                "Placement {}x{} at ({}, {}) exceeds canvas '{}' ({}x{})",
                rect.width,
                rect.height,
                rect.x,
                rect.y,
                canvas.name,
                canvas.width(),
                canvas.height()
            ),
            help: None,
        });
    }
    Ok(())
}

/// Which of the fixed canvases an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasKind {
    Primary,
    Autopick,
    Mask,
}

impl CanvasKind {
    pub const ALL: [CanvasKind; 3] = [CanvasKind::Primary, CanvasKind::Autopick, CanvasKind::Mask];

    /// Output name of the canvas.
    pub fn name(self) -> &'static str {
        match self {
            CanvasKind::Primary => "canvas",
            CanvasKind::Autopick => "autopick",
            CanvasKind::Mask => "mask",
        }
    }
}

/// Owns the primary, autopick and mask canvases for one run.
#[derive(Debug, Clone)]
pub struct Compositor {
    primary: Canvas,
    autopick: Canvas,
    mask: Canvas,
}

impl Compositor {
    /// Allocate the three canvases. The mask canvas uses the opaque background.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            primary: Canvas::new(CanvasKind::Primary.name(), width, height, Background::Transparent)?,
            autopick: Canvas::new(CanvasKind::Autopick.name(), width, height, Background::Transparent)?,
            mask: Canvas::new(CanvasKind::Mask.name(), width, height, Background::MASK)?,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        self.primary.size()
    }

    pub fn canvas(&self, kind: CanvasKind) -> &Canvas {
        match kind {
            CanvasKind::Primary => &self.primary,
            CanvasKind::Autopick => &self.autopick,
            CanvasKind::Mask => &self.mask,
        }
    }

    fn canvas_mut(&mut self, kind: CanvasKind) -> &mut Canvas {
        match kind {
            CanvasKind::Primary => &mut self.primary,
            CanvasKind::Autopick => &mut self.autopick,
            CanvasKind::Mask => &mut self.mask,
        }
    }

    pub fn composite(&mut self, kind: CanvasKind, image: &RgbaImage, rect: Rect) -> Result<()> {
        composite(self.canvas_mut(kind), image, rect)
    }

    pub fn erase(&mut self, kind: CanvasKind, stencil: &RgbaImage, rect: Rect) -> Result<()> {
        erase(self.canvas_mut(kind), stencil, rect)
    }

    /// Erase `stencil` from every fixed canvas.
    pub fn erase_all(&mut self, stencil: &RgbaImage, rect: Rect) -> Result<()> {
        for kind in CanvasKind::ALL {
            self.erase(kind, stencil, rect)?;
        }
        Ok(())
    }

    /// Hand the canvases over as (primary, autopick, mask).
    pub fn into_canvases(self) -> (Canvas, Canvas, Canvas) {
        (self.primary, self.autopick, self.mask)
    }
}
