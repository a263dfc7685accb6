//! Bounding box accumulation for export groups.

use super::Rect;

/// Tight bounding union of every rectangle merged into it.
///
/// Undefined until the first update. Right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtentBox {
    bounds: Option<(u32, u32, u32, u32)>,
}

impl ExtentBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `rect` into the box. The first call seeds it exactly.
    pub fn update(&mut self, rect: Rect) {
        let next = (rect.x, rect.y, rect.right(), rect.bottom());
        self.bounds = Some(match self.bounds {
            None => next,
            Some((x1, y1, x2, y2)) => (x1.min(next.0), y1.min(next.1), x2.max(next.2), y2.max(next.3)),
        });
    }

    /// `(x1, y1, x2, y2)`, or `None` before the first update.
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        self.bounds
    }

    /// The box as a rectangle.
    pub fn rect(&self) -> Option<Rect> {
        self.bounds
            .map(|(x1, y1, x2, y2)| Rect::new(x1, y1, x2 - x1, y2 - y1))
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Whether the box lies within a `width` x `height` canvas.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        match self.bounds {
            Some((x1, y1, x2, y2)) => x1 <= x2 && y1 <= y2 && x2 <= width && y2 <= height,
            None => false,
        }
    }
}
