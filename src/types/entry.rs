//! Template entries: positioned sub-images and their flags.

use crate::error::{AsmError, Result};

/// Coordinate convention an entry's `x`/`y` are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Canvas-local, top-left is (0, 0).
    #[default]
    TopLeft,
    /// Centre-relative coordinates, re-based by a fixed offset.
    Center,
}

/// A placed rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether `(px, py)` falls inside the rectangle.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// One positioned sub-image contributing to the composite.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateEntry {
    /// Display name, used for diagnostics.
    pub name: String,
    pub x: i64,
    pub y: i64,
    pub origin: Origin,
    /// Candidate image sources, tried in order.
    pub sources: Vec<String>,
    /// Eligible for the autopick and mask canvases.
    pub autopick: bool,
    /// Mask priority, valid in `1..=10`.
    pub priority: i64,
    pub export_group: Option<String>,
    /// Unix timestamp before which the entry is gated out.
    pub enabled_utc: Option<i64>,
    /// Stamp a blank over this footprint instead of drawing.
    pub exclude: bool,
    /// Forced footprint for excluded entries that carry no image.
    pub size: Option<(u32, u32)>,
}

impl TemplateEntry {
    pub const DEFAULT_PRIORITY: i64 = 1;

    /// Create an entry with default flags.
    pub fn new(name: impl Into<String>, x: i64, y: i64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            origin: Origin::TopLeft,
            sources: Vec::new(),
            autopick: false,
            priority: Self::DEFAULT_PRIORITY,
            export_group: None,
            enabled_utc: None,
            exclude: false,
            size: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    pub fn with_autopick(mut self, autopick: bool) -> Self {
        self.autopick = autopick;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.export_group = Some(group.into());
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_enabled_utc(mut self, at: i64) -> Self {
        self.enabled_utc = Some(at);
        self
    }

    /// Mark as an exclusion stamp, optionally with a forced footprint.
    pub fn excluded(mut self, size: Option<(u32, u32)>) -> Self {
        self.exclude = true;
        self.size = size;
        self
    }

    /// Whether the entry is live at unix time `now`.
    pub fn is_enabled(&self, now: i64) -> bool {
        self.enabled_utc.map_or(true, |at| now >= at)
    }

    /// Resolve the entry's footprint to a rectangle on a `canvas` sized canvas.
    ///
    /// Centre-origin coordinates are shifted by `center_offset`. The
    /// rectangle must land fully inside the canvas; nothing is clipped.
    pub fn placement(
        &self,
        width: u32,
        height: u32,
        center_offset: (i64, i64),
        canvas: (u32, u32),
    ) -> Result<Rect> {
        let outside = |x: String, y: String| AsmError::Config {
            message: format!(
                "Entry '{}' at ({}, {}) with size {}x{} exceeds the {}x{} canvas",
                self.name, x, y, width, height, canvas.0, canvas.1
            ),
            help: match self.origin {
                Origin::TopLeft if self.x < 0 || self.y < 0 => {
                    Some("Negative coordinates need \"respects_center\": true".to_string())
                }
                _ => None,
            },
        };

        let (x, y) = match self.origin {
            Origin::TopLeft => (self.x, self.y),
            Origin::Center => match (
                self.x.checked_add(center_offset.0),
                self.y.checked_add(center_offset.1),
            ) {
                (Some(x), Some(y)) => (x, y),
                _ => {
                    return Err(outside(
                        format!("{}{:+}", self.x, center_offset.0),
                        format!("{}{:+}", self.y, center_offset.1),
                    ))
                }
            },
        };

        let fits = x >= 0
            && y >= 0
            && x.checked_add(i64::from(width)).is_some_and(|r| r <= i64::from(canvas.0))
            && y.checked_add(i64::from(height)).is_some_and(|b| b <= i64::from(canvas.1));

        if !fits {
            return Err(outside(x.to_string(), y.to_string()));
        }

        Ok(Rect::new(x as u32, y as u32, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_left_placement() {
        let entry = TemplateEntry::new("a", 10, 20);
        let rect = entry.placement(5, 6, (1000, 1000), (100, 100)).unwrap();
        assert_eq!(rect, Rect::new(10, 20, 5, 6));
        assert_eq!(rect.right(), 15);
        assert_eq!(rect.bottom(), 26);
    }

    #[test]
    fn test_center_origin_rebases_by_fixed_offset() {
        let entry = TemplateEntry::new("c", -10, -5).with_origin(Origin::Center);
        let rect = entry.placement(4, 4, (1000, 1000), (2000, 2000)).unwrap();
        assert_eq!((rect.x, rect.y), (990, 995));
    }

    #[test]
    fn test_negative_top_left_is_error() {
        let entry = TemplateEntry::new("neg", -1, 0);
        let err = entry.placement(2, 2, (1000, 1000), (10, 10)).unwrap_err();
        assert!(matches!(err, AsmError::Config { help: Some(_), .. }));
    }

    #[test]
    fn test_overflow_is_error_not_clipped() {
        let entry = TemplateEntry::new("wide", 8, 0);
        assert!(entry.placement(3, 1, (0, 0), (10, 10)).is_err());
        assert!(entry.placement(2, 1, (0, 0), (10, 10)).is_ok());
    }

    #[test]
    fn test_extreme_coordinates_are_errors() {
        let top_left = TemplateEntry::new("huge", i64::MAX, 0);
        let err = top_left.placement(2, 2, (1000, 1000), (2000, 2000)).unwrap_err();
        assert!(matches!(err, AsmError::Config { .. }));

        let tall = TemplateEntry::new("tall", 0, i64::MAX);
        assert!(tall.placement(2, 2, (1000, 1000), (2000, 2000)).is_err());

        let centred = TemplateEntry::new("huge", i64::MAX - 10, 0).with_origin(Origin::Center);
        let err = centred.placement(2, 2, (1000, 1000), (2000, 2000)).unwrap_err();
        assert!(matches!(err, AsmError::Config { .. }));

        let centred = TemplateEntry::new("huge", i64::MAX, i64::MAX).with_origin(Origin::Center);
        assert!(centred.placement(1, 1, (1000, 1000), (2000, 2000)).is_err());
    }

    #[test]
    fn test_enabled_gate() {
        let entry = TemplateEntry::new("page", 0, 0).with_enabled_utc(1_690_002_000);
        assert!(!entry.is_enabled(1_690_001_999));
        assert!(entry.is_enabled(1_690_002_000));
        assert!(TemplateEntry::new("always", 0, 0).is_enabled(0));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(2, 2, 2, 2);
        assert!(rect.contains(2, 3));
        assert!(!rect.contains(4, 2));
    }
}
