//! Priority mask generation.
//!
//! Opaque pixels are classified as boundary (on the image edge or touching
//! transparency through any of the 8 neighbours) or interior. Boundary
//! pixels form the first ring; each further ring is the interior pixels
//! 8-adjacent to the previous one. Rings are painted with descending grey
//! levels and whatever erosion never reached is painted with the flat base
//! priority. Lower values mark pixels that are safer to place first.

use image::{Rgba, RgbaImage};

use crate::error::{AsmError, Result};
use crate::types::Colour;

/// Number of eroded rings that get their own level.
pub const RING_COUNT: u8 = 6;

/// Level added to the outermost ring on top of the base priority.
pub const RING_BOOST: u8 = 25;

/// Level drop per ring.
pub const RING_STEP: u8 = 5;

/// Multiplier from entry priority to base mask level.
pub const PRIORITY_SCALE: u8 = 23;

pub const MIN_PRIORITY: i64 = 1;
pub const MAX_PRIORITY: i64 = 10;

const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Base mask level for a priority in `1..=10`.
pub fn base_priority(priority: i64) -> Result<u8> {
    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        return Err(AsmError::Config {
            message: format!("Priority {} is outside {}..={}", priority, MIN_PRIORITY, MAX_PRIORITY),
            help: Some("Use a priority between 1 (default) and 10".to_string()),
        });
    }
    Ok(priority as u8 * PRIORITY_SCALE)
}

/// Classification of one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Transparent,
    Boundary,
    Interior,
}

/// Per-pixel boundary classification of an image.
#[derive(Debug, Clone)]
pub struct BoundaryMap {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl BoundaryMap {
    /// Classify every pixel of `image`.
    ///
    /// Two passes: a transparency map, then the 8-neighbour scan against it.
    pub fn classify(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let opaque: Vec<bool> = image
            .pixels()
            .map(|px| Colour::from(*px).is_visible())
            .collect();

        let mut cells = Vec::with_capacity(opaque.len());
        for y in 0..height {
            for x in 0..width {
                let idx = (y * width + x) as usize;
                let cell = if !opaque[idx] {
                    Cell::Transparent
                } else if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    Cell::Boundary
                } else if NEIGHBOURS.iter().any(|&(dx, dy)| {
                    let n = ((y as i64 + dy) * width as i64 + (x as i64 + dx)) as usize;
                    !opaque[n]
                }) {
                    Cell::Boundary
                } else {
                    Cell::Interior
                };
                cells.push(cell);
            }
        }

        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell at `(x, y)`, or `None` out of range.
    pub fn get(&self, x: u32, y: u32) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[(y * self.width + x) as usize])
    }

    pub fn is_boundary(&self, x: u32, y: u32) -> bool {
        self.get(x, y) == Some(Cell::Boundary)
    }

    /// Indices of all boundary cells, row-major.
    fn boundary(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Boundary)
            .map(|(i, _)| i)
            .collect()
    }

    /// In-range 8-neighbour indices of `idx`.
    fn neighbours(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let x = (idx % self.width as usize) as i64;
        let y = (idx / self.width as usize) as i64;
        NEIGHBOURS.iter().filter_map(move |&(dx, dy)| {
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.height as i64 {
                None
            } else {
                Some((ny * self.width as i64 + nx) as usize)
            }
        })
    }
}

/// Mask level for ring `ring` (0 is the outermost).
pub fn ring_level(base: u8, ring: u8) -> u8 {
    base + RING_BOOST - ring * RING_STEP
}

/// Paint the priority mask for a classified image.
///
/// `base` must come from [`base_priority`], which keeps every level within 255.
pub fn generate(map: &BoundaryMap, base: u8) -> RgbaImage {
    let mut mask = RgbaImage::new(map.width, map.height);
    let mut painted = vec![false; map.cells.len()];
    let mut interior: Vec<bool> = map.cells.iter().map(|c| *c == Cell::Interior).collect();
    let mut edge = map.boundary();

    for ring in 0..RING_COUNT {
        let level = Rgba(Colour::grey(ring_level(base, ring)).to_rgba());
        let mut next = Vec::new();

        for &idx in &edge {
            put(&mut mask, map.width, idx, level);
            painted[idx] = true;
        }
        for &idx in &edge {
            for n in map.neighbours(idx) {
                if interior[n] {
                    interior[n] = false;
                    next.push(n);
                }
            }
        }

        edge = next;
    }

    // Uneroded ring and deep interior both flatten to base.
    let flat = Rgba(Colour::grey(base).to_rgba());
    for (idx, cell) in map.cells.iter().enumerate() {
        if *cell != Cell::Transparent && !painted[idx] {
            put(&mut mask, map.width, idx, flat);
        }
    }

    mask
}

/// Classify `image` and paint its mask at `priority`.
pub fn priority_mask(image: &RgbaImage, priority: i64) -> Result<RgbaImage> {
    let base = base_priority(priority)?;
    Ok(generate(&BoundaryMap::classify(image), base))
}

fn put(mask: &mut RgbaImage, width: u32, idx: usize, px: Rgba<u8>) {
    let x = (idx % width as usize) as u32;
    let y = (idx / width as usize) as u32;
    mask.put_pixel(x, y, px);
}
