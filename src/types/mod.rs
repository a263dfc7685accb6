//! Core domain types for ptasm.
//!
//! - `Colour` - RGBA colour values
//! - `Palette` - the fixed set of allowed opaque colours
//! - `TemplateEntry` / `Rect` - positioned sub-images and their placement
//! - `ExtentBox` - export group bounding boxes

mod colour;
mod entry;
mod extent;
mod palette;

pub use colour::Colour;
pub use entry::{Origin, Rect, TemplateEntry};
pub use extent::ExtentBox;
pub use palette::{Palette, BUILTIN_PALETTES};
