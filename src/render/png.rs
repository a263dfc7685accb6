//! PNG output for finished canvases and group crops.
//!
//! Everything is written as 8-bit RGBA. The canvases are palette-locked
//! already, so an indexed encoding would only shrink the files, and the
//! mask's grey levels are not palette colours at all.

use std::path::Path;

use image::RgbaImage;

use crate::error::{AsmError, Result};

/// Write an RGBA buffer to a PNG file.
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|e| AsmError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })
}

/// File name for an export group's crop: `endu-<name>.png`.
///
/// Characters that are awkward in paths and URLs become `_`.
pub fn group_file_name(group: &str) -> String {
    let clean: String = group
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("endu-{}.png", clean)
}
