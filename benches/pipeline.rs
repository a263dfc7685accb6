//! Benchmarks for the ptasm pipeline.

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};

use ptasm::render::{composite, Background, Canvas};
use ptasm::{
    priority_mask, AsmError, ColourMetric, ImageResolver, Palette, PaletteNormalizer, Pipeline,
    PipelineOptions, Rect, Result, TemplateEntry,
};

/// Off-palette noise so the nearest-colour cache has real work to do.
fn noisy(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let v = x.wrapping_mul(31) ^ y.wrapping_mul(17);
        Rgba([(v & 0xff) as u8, ((v >> 3) & 0xff) as u8, ((x + y) & 0xff) as u8, 255])
    })
}

/// A filled disc, so the mask has a real boundary and deep interior.
fn disc(size: u32) -> RgbaImage {
    let r = size as i64 / 2;
    RgbaImage::from_fn(size, size, |x, y| {
        let (dx, dy) = (x as i64 - r, y as i64 - r);
        if dx * dx + dy * dy <= r * r {
            Rgba([255, 69, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

struct Memory(HashMap<String, RgbaImage>);

impl ImageResolver for Memory {
    fn resolve(&mut self, source: &str) -> Result<RgbaImage> {
        self.0.get(source).cloned().ok_or_else(|| AsmError::Load {
            message: source.to_string(),
            help: None,
        })
    }
}

// -- Normalization benchmarks --

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let palette = Palette::default();
    let image = noisy(128, 128);

    for metric in [ColourMetric::Ciede2000, ColourMetric::Redmean] {
        group.bench_function(format!("noisy_128_{}", metric), |b| {
            b.iter(|| {
                let mut normalizer = PaletteNormalizer::new(&palette, metric);
                normalizer.normalize(black_box(&image))
            })
        });
    }

    group.finish();
}

// -- Mask benchmarks --

fn bench_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask");

    for size in [32, 256] {
        let image = disc(size);
        group.bench_function(format!("disc_{}", size), |b| {
            b.iter(|| priority_mask(black_box(&image), 5).unwrap())
        });
    }

    group.finish();
}

// -- Compositing benchmarks --

fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");
    let image = disc(256);

    group.bench_function("disc_256_on_2000", |b| {
        let mut canvas = Canvas::new("canvas", 2000, 2000, Background::Transparent).unwrap();
        b.iter(|| composite(&mut canvas, black_box(&image), Rect::new(500, 500, 256, 256)).unwrap())
    });

    group.finish();
}

// -- Full pipeline --

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let mut images = HashMap::new();
    images.insert("disc.png".to_string(), disc(64));
    images.insert("noise.png".to_string(), noisy(64, 64));

    let entries: Vec<TemplateEntry> = (0..40)
        .map(|i| {
            let source = if i % 2 == 0 { "disc.png" } else { "noise.png" };
            TemplateEntry::new(format!("entry-{}", i), (i % 8) * 60, (i / 8) * 60)
                .with_source(source)
                .with_autopick(i % 3 != 0)
                .with_priority(1 + i % 10)
                .with_group(format!("g{}", i % 4))
        })
        .collect();

    let palette = Palette::default();
    let options = PipelineOptions {
        canvas: (512, 512),
        ..Default::default()
    };

    group.bench_function("40_entries_512", |b| {
        b.iter(|| {
            let mut pipeline = Pipeline::new(&palette, Memory(images.clone()), options.clone());
            pipeline.run(black_box(&entries)).unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_mask, bench_composite, bench_pipeline);
criterion_main!(benches);
