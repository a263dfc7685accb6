//! Canvas - a named, full-size pixel buffer with a background convention.

use image::{imageops, RgbaImage};

use crate::error::{AsmError, Result};
use crate::types::{Colour, Rect};

/// What a canvas starts as, and what erasing restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Fully transparent (0, 0, 0, 0).
    Transparent,
    /// Mask-style: masked-out pixels hold this opaque sentinel.
    Opaque(Colour),
}

impl Background {
    /// Opaque sentinel used by the priority mask canvas.
    pub const MASK: Self = Background::Opaque(Colour::BLACK);

    pub fn colour(self) -> Colour {
        match self {
            Background::Transparent => Colour::TRANSPARENT,
            Background::Opaque(c) => Colour::rgb(c.r, c.g, c.b),
        }
    }
}

/// A full-size output buffer: primary, autopick, mask, or an export group.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Canvas name, used for output file names.
    pub name: String,

    image: RgbaImage,

    background: Background,
}

impl Canvas {
    /// Allocate a canvas filled with its background.
    pub fn new(name: impl Into<String>, width: u32, height: u32, background: Background) -> Result<Self> {
        let name = name.into();
        if width == 0 || height == 0 {
            return Err(AsmError::Build {
                message: format!("Canvas '{}' cannot be {}x{}", name, width, height),
                help: Some("Set a non-zero `canvas` size in ptasm.yaml".to_string()),
            });
        }

        Ok(Self {
            name,
            image: RgbaImage::from_pixel(width, height, background.colour().into()),
            background,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Get the dimensions as (width, height).
    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn background(&self) -> Background {
        self.background
    }

    /// Get a pixel at the given position.
    pub fn get(&self, x: u32, y: u32) -> Option<Colour> {
        self.image.get_pixel_checked(x, y).map(|px| Colour::from(*px))
    }

    /// Set a pixel. Out-of-range writes are ignored.
    pub fn put(&mut self, x: u32, y: u32, colour: Colour) {
        if let Some(px) = self.image.get_pixel_mut_checked(x, y) {
            *px = colour.into();
        }
    }

    /// Whether `rect` lies fully inside the canvas.
    pub fn contains_rect(&self, rect: &Rect) -> bool {
        rect.right() <= self.width() && rect.bottom() <= self.height()
    }

    /// Copy out a region.
    pub fn crop(&self, rect: &Rect) -> RgbaImage {
        imageops::crop_imm(&self.image, rect.x, rect.y, rect.width, rect.height).to_image()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    /// Release the pixel buffer to a writer.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
