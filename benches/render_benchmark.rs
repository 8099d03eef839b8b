//! Benchmarks for profile sheet rendering.
//!
//! Run with: cargo bench

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use profilepdf::{DocumentSpec, LayoutEngine, LayoutOptions};

/// A sheet shaped like a filled-in player profile.
fn profile_spec(rows: usize) -> DocumentSpec {
    let mut spec = DocumentSpec::new("Volleyball Player Profile");
    for i in 0..rows {
        spec = spec
            .with_field(
                format!("Field {}", i + 1),
                "Asian Games 2022, AVC Challenge Cup 2021, South Asian Games 2019",
            )
            .unwrap();
    }
    spec
}

/// A synthetic JPEG about the size of a passport photo scan.
fn photo(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Jpeg)
        .unwrap();
    buf.into_inner()
}

/// Benchmark layout alone, without serialization.
fn bench_layout(c: &mut Criterion) {
    let engine = LayoutEngine::default();
    let spec = profile_spec(12);

    c.bench_function("plan_12_rows", |b| {
        b.iter(|| engine.plan(black_box(&spec)).unwrap());
    });
}

/// Benchmark full rendering with and without a photo.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let engine = LayoutEngine::default();
    let text_only = profile_spec(12);
    group.bench_function("text_only", |b| {
        b.iter(|| engine.render(black_box(&text_only)).unwrap());
    });

    for size in [300u32, 1200].iter() {
        let spec = profile_spec(12).with_image(photo(*size, *size * 7 / 6));
        group.bench_function(format!("photo_{}px", size), |b| {
            b.iter(|| engine.render(black_box(&spec)).unwrap());
        });
    }

    let uncompressed = LayoutEngine::new(LayoutOptions::new().with_compression(false)).unwrap();
    group.bench_function("text_only_uncompressed", |b| {
        b.iter(|| uncompressed.render(black_box(&text_only)).unwrap());
    });

    group.finish();
}

/// Benchmark reading a generated sheet back.
fn bench_inspect(c: &mut Criterion) {
    let bytes = profilepdf::render(&profile_spec(12)).unwrap();

    c.bench_function("inspect_bytes", |b| {
        b.iter(|| profilepdf::inspect_bytes(black_box(&bytes)).unwrap());
    });
}

criterion_group!(benches, bench_layout, bench_render, bench_inspect);
criterion_main!(benches);
