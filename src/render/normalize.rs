//! Palette normalization.
//!
//! Forces every drawn pixel of a decoded image onto the palette. Alpha
//! below the threshold becomes fully transparent; everything else is
//! snapped to the nearest palette colour and made opaque. Nearest-colour
//! lookups are cached per distinct RGB triple for the normalizer's lifetime.

use std::collections::HashMap;
use std::fmt;

use image::RgbaImage;
use palette::color_difference::Ciede2000;
use palette::{IntoColor, Lab, Srgb};
use serde::{Deserialize, Serialize};

use crate::types::{Colour, Palette};

/// Correction distance above which an image is too lossy for autopick.
pub const DEFAULT_LOSSY_THRESHOLD: f32 = 20.0;

/// Colour distance used to pick the nearest palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColourMetric {
    /// CIEDE2000 ΔE on CIE Lab (D65).
    #[default]
    Ciede2000,
    /// Low-cost weighted RGB distance ("redmean").
    Redmean,
}

impl fmt::Display for ColourMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColourMetric::Ciede2000 => write!(f, "ciede2000"),
            ColourMetric::Redmean => write!(f, "redmean"),
        }
    }
}

/// A palette-normalized image and how much correcting it took.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub image: RgbaImage,
    /// Largest correction distance applied to any pixel.
    pub max_error: f32,
    /// Number of drawn pixels whose colour had to change.
    pub corrected: usize,
    /// `max_error` exceeded the threshold; keep off autopick canvases.
    pub lossy: bool,
}

/// Maps images onto a palette, memoizing each distinct input colour.
pub struct PaletteNormalizer<'a> {
    palette: &'a Palette,
    metric: ColourMetric,
    threshold: f32,
    /// Palette colours in Lab, parallel to `palette.colours()`.
    lab: Vec<Lab>,
    cache: HashMap<[u8; 3], (Colour, f32)>,
}

impl<'a> PaletteNormalizer<'a> {
    pub fn new(palette: &'a Palette, metric: ColourMetric) -> Self {
        Self {
            palette,
            metric,
            threshold: DEFAULT_LOSSY_THRESHOLD,
            lab: palette.colours().iter().map(|c| to_lab(*c)).collect(),
            cache: HashMap::new(),
        }
    }

    /// Override the lossy threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn palette(&self) -> &Palette {
        self.palette
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Number of distinct colours resolved so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Normalize an image. Never fails; quality is reported through `lossy`.
    pub fn normalize(&mut self, image: &RgbaImage) -> Normalized {
        let mut out = RgbaImage::new(image.width(), image.height());
        let mut max_error = 0.0_f32;
        let mut corrected = 0;

        for (x, y, px) in image.enumerate_pixels() {
            let colour = Colour::from(*px);
            if !colour.is_visible() {
                // RgbaImage::new is already (0, 0, 0, 0)
                continue;
            }

            let (snapped, error) = self.nearest(colour);
            if snapped.rgb_key() != colour.rgb_key() {
                corrected += 1;
            }
            max_error = max_error.max(error);
            out.put_pixel(x, y, snapped.into());
        }

        Normalized {
            image: out,
            max_error,
            corrected,
            lossy: max_error > self.threshold,
        }
    }

    /// Nearest palette colour (opaque) and the distance to it.
    ///
    /// Exact members short-circuit with distance zero. Ties go to the
    /// colour declared first.
    pub fn nearest(&mut self, colour: Colour) -> (Colour, f32) {
        let key = colour.rgb_key();
        if self.palette.contains(colour) {
            return (Colour::rgb(key[0], key[1], key[2]), 0.0);
        }
        if let Some(hit) = self.cache.get(&key) {
            return *hit;
        }

        let source_lab = to_lab(colour);
        let mut best = (self.palette.colours()[0], f32::INFINITY);
        for (candidate, lab) in self.palette.colours().iter().zip(&self.lab) {
            let dist = match self.metric {
                ColourMetric::Ciede2000 => source_lab.difference(*lab),
                ColourMetric::Redmean => redmean_distance(colour, *candidate),
            };
            if dist < best.1 {
                best = (*candidate, dist);
            }
        }

        self.cache.insert(key, best);
        best
    }
}

fn to_lab(colour: Colour) -> Lab {
    Srgb::new(colour.r, colour.g, colour.b)
        .into_format::<f32>()
        .into_color()
}

/// Weighted RGB distance, from https://www.compuphase.com/cmetric.htm.
///
/// Red and blue weights shift with the mean red level. Symmetric and zero
/// only for identical RGB.
pub fn redmean_distance(a: Colour, b: Colour) -> f32 {
    let rmean = (i32::from(a.r) + i32::from(b.r)) / 2;
    let dr = i32::from(a.r) - i32::from(b.r);
    let dg = i32::from(a.g) - i32::from(b.g);
    let db = i32::from(a.b) - i32::from(b.b);

    let weighted = (((512 + rmean) * dr * dr) >> 8) + 4 * dg * dg + (((767 - rmean) * db * db) >> 8);
    (weighted as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn place() -> Palette {
        Palette::builtin("place-2023").unwrap()
    }

    fn image_of(pixels: &[[u8; 4]]) -> RgbaImage {
        let mut img = RgbaImage::new(pixels.len() as u32, 1);
        for (x, px) in pixels.iter().enumerate() {
            img.put_pixel(x as u32, 0, Rgba(*px));
        }
        img
    }

    #[test]
    fn test_low_alpha_becomes_fully_transparent() {
        let palette = place();
        let mut normalizer = PaletteNormalizer::new(&palette, ColourMetric::default());
        let result = normalizer.normalize(&image_of(&[[255, 69, 0, 127], [12, 34, 56, 1]]));

        assert_eq!(result.image.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(result.image.get_pixel(1, 0).0, [0, 0, 0, 0]);
        assert_eq!(result.max_error, 0.0);
        assert!(!result.lossy);
    }

    #[test]
    fn test_exact_members_kept_and_made_opaque() {
        let palette = place();
        let mut normalizer = PaletteNormalizer::new(&palette, ColourMetric::default());
        let result = normalizer.normalize(&image_of(&[[255, 69, 0, 200]]));

        assert_eq!(result.image.get_pixel(0, 0).0, [255, 69, 0, 255]);
        assert_eq!(result.corrected, 0);
        assert_eq!(normalizer.cached(), 0);
    }

    #[test]
    fn test_palette_closure() {
        let palette = place();
        let mut normalizer = PaletteNormalizer::new(&palette, ColourMetric::default());
        let mut img = RgbaImage::new(16, 16);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgba([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8, 255]);
        }

        let result = normalizer.normalize(&img);
        for px in result.image.pixels() {
            let c = Colour::from(*px);
            assert!(palette.contains(c), "{} not in palette", c);
            assert!(c.is_opaque());
        }
    }

    #[test]
    fn test_near_colour_snaps_without_being_lossy() {
        let palette = place();
        let mut normalizer = PaletteNormalizer::new(&palette, ColourMetric::Ciede2000);
        let result = normalizer.normalize(&image_of(&[[253, 70, 2, 255]]));

        assert_eq!(result.image.get_pixel(0, 0).0, [255, 69, 0, 255]);
        assert_eq!(result.corrected, 1);
        assert!(result.max_error > 0.0);
        assert!(!result.lossy);
    }

    #[test]
    fn test_far_colour_is_lossy() {
        let palette = Palette::builtin("mono").unwrap();
        let mut normalizer = PaletteNormalizer::new(&palette, ColourMetric::Ciede2000);
        let result = normalizer.normalize(&image_of(&[[255, 0, 0, 255]]));

        assert!(result.lossy, "max error {}", result.max_error);
    }

    #[test]
    fn test_threshold_override() {
        let palette = Palette::builtin("mono").unwrap();
        let mut normalizer =
            PaletteNormalizer::new(&palette, ColourMetric::Ciede2000).with_threshold(1000.0);
        let result = normalizer.normalize(&image_of(&[[255, 0, 0, 255]]));
        assert!(!result.lossy);
    }

    #[test]
    fn test_cache_resolves_each_colour_once() {
        let palette = place();
        let mut normalizer = PaletteNormalizer::new(&palette, ColourMetric::default());
        let img = image_of(&[[10, 10, 10, 255], [10, 10, 10, 255], [200, 10, 10, 255]]);
        let first = normalizer.normalize(&img);
        assert_eq!(normalizer.cached(), 2);

        let second = normalizer.normalize(&img);
        assert_eq!(normalizer.cached(), 2);
        assert_eq!(first.image, second.image);
    }

    #[test]
    fn test_redmean_metric_picks_nearest() {
        let palette = Palette::builtin("mono").unwrap();
        let mut normalizer = PaletteNormalizer::new(&palette, ColourMetric::Redmean);
        assert_eq!(normalizer.nearest(Colour::rgb(30, 30, 30)).0, Colour::BLACK);
        assert_eq!(normalizer.nearest(Colour::rgb(220, 220, 220)).0, Colour::WHITE);
    }

    #[test]
    fn test_redmean_is_symmetric_and_zero_only_for_identical() {
        let a = Colour::rgb(10, 200, 30);
        let b = Colour::rgb(250, 0, 90);
        assert_eq!(redmean_distance(a, b), redmean_distance(b, a));
        assert_eq!(redmean_distance(a, a), 0.0);
        assert!(redmean_distance(a, Colour::rgb(10, 200, 31)) > 0.0);
    }

    #[test]
    fn test_metric_deserializes_lowercase() {
        let metric: ColourMetric = serde_json::from_str("\"redmean\"").unwrap();
        assert_eq!(metric, ColourMetric::Redmean);
        assert_eq!(ColourMetric::Ciede2000.to_string(), "ciede2000");
    }
}
