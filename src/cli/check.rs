//! Check command implementation.
//!
//! Normalizes one image against the project palette and reports each
//! off-palette colour with its replacement and correction distance.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;

use crate::discovery::{find_manifest, Manifest};
use crate::error::{AsmError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::{write_png, ColourMetric, PaletteNormalizer};
use crate::types::{Colour, Palette};

/// Report how far an image is from the palette
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Image to check
    #[arg(required = true)]
    pub file: PathBuf,

    /// Builtin palette to check against (default: from ptasm.yaml)
    #[arg(long)]
    pub palette: Option<String>,

    /// Colour metric (default: from ptasm.yaml)
    #[arg(long, value_parser = parse_metric)]
    pub metric: Option<ColourMetric>,

    /// Write the palette-normalized image here
    #[arg(long)]
    pub fix: Option<PathBuf>,
}

/// One off-palette colour and what it snaps to.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub from: Colour,
    pub to: Colour,
    pub distance: f32,
    pub pixels: usize,
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    let path = &args.file;
    let display = display_path(path);

    let manifest = match path.parent().and_then(find_manifest) {
        Some(p) => Manifest::load(&p)?,
        None => Manifest::default(),
    };
    let palette = match &args.palette {
        Some(name) => Palette::builtin(name).ok_or_else(|| AsmError::Config {
            message: format!("Unknown palette '{}'", name),
            help: None,
        })?,
        None => manifest.palette()?,
    };
    let metric = args.metric.unwrap_or(manifest.metric);

    let image = image::open(path)
        .map_err(|e| AsmError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?
        .to_rgba8();

    let mut normalizer =
        PaletteNormalizer::new(&palette, metric).with_threshold(manifest.lossy_threshold);
    let corrections = corrections(&mut normalizer, &image);
    let normalized = normalizer.normalize(&image);

    printer.status(
        "Checked",
        &format!(
            "{} against {} ({})",
            display,
            palette.name,
            plural(corrections.len(), "off-palette colour", "off-palette colours")
        ),
    );

    // Corrections go to stdout, worst first
    for c in &corrections {
        println!("{} -> {}  ΔE {:.1}  ({} px)", c.from, c.to, c.distance, c.pixels);
    }

    if normalized.lossy {
        printer.warning(
            "Lossy",
            &format!(
                "worst correction ΔE {:.1} exceeds {}; this image would be kept off autopick",
                normalized.max_error,
                normalizer.threshold()
            ),
        );
    }

    if let Some(out) = &args.fix {
        write_png(&normalized.image, out)?;
        printer.status("Fixed", &display_path(out));
    }

    Ok(())
}

/// Off-palette colours among drawn pixels, worst correction first.
pub fn corrections(normalizer: &mut PaletteNormalizer<'_>, image: &image::RgbaImage) -> Vec<Correction> {
    let mut counts: BTreeMap<[u8; 3], usize> = BTreeMap::new();
    for px in image.pixels() {
        let colour = Colour::from(*px);
        if colour.is_visible() && !normalizer.palette().contains(colour) {
            *counts.entry(colour.rgb_key()).or_insert(0) += 1;
        }
    }

    let mut out: Vec<Correction> = counts
        .into_iter()
        .map(|(key, pixels)| {
            let from = Colour::rgb(key[0], key[1], key[2]);
            let (to, distance) = normalizer.nearest(from);
            Correction {
                from,
                to,
                distance,
                pixels,
            }
        })
        .collect();

    out.sort_by(|a, b| b.distance.total_cmp(&a.distance));
    out
}

fn parse_metric(s: &str) -> std::result::Result<ColourMetric, String> {
    match s {
        "ciede2000" => Ok(ColourMetric::Ciede2000),
        "redmean" => Ok(ColourMetric::Redmean),
        other => Err(format!("unknown metric '{}' (expected ciede2000 or redmean)", other)),
    }
}
