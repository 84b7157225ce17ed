// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, GrayImage, Luma};
use keyforge::{generate, CancelToken, KeychainParams, StlFormat};

fn square_png(size: u32) -> Vec<u8> {
    let mut img = GrayImage::from_pixel(size, size, Luma([255u8]));
    let margin = size / 8;
    for y in margin..size - margin {
        for x in margin..size - margin {
            img.put_pixel(x, y, Luma([0u8]));
        }
    }
    let mut bytes = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn disc_png(size: u32) -> Vec<u8> {
    let mut img = GrayImage::from_pixel(size, size, Luma([255u8]));
    let c = size as f64 / 2.0;
    let r = size as f64 * 0.4;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 + 0.5 - c;
            let dy = y as f64 + 0.5 - c;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x, y, Luma([0u8]));
            }
        }
    }
    let mut bytes = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn bench_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace");

    for size in [64u32, 256, 512] {
        let png = disc_png(size);
        group.bench_with_input(BenchmarkId::new("disc", size), &png, |b, png| {
            b.iter(|| {
                let image = keyforge::trace::decode(black_box(png)).unwrap();
                keyforge::trace::trace(&image).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(20);

    let png = square_png(256);
    let token = CancelToken::new();

    let base_only = KeychainParams {
        has_hole: false,
        ..KeychainParams::default()
    };
    group.bench_function("base_only", |b| {
        b.iter(|| {
            generate(
                black_box(&png),
                black_box(&base_only),
                StlFormat::Binary,
                &token,
            )
            .unwrap()
        });
    });

    let with_hole = KeychainParams::default();
    group.bench_function("with_hole", |b| {
        b.iter(|| {
            generate(
                black_box(&png),
                black_box(&with_hole),
                StlFormat::Binary,
                &token,
            )
            .unwrap()
        });
    });

    let full = KeychainParams {
        text: "KEYFORGE".into(),
        ..KeychainParams::default()
    };
    group.bench_function("with_hole_and_text", |b| {
        b.iter(|| {
            generate(black_box(&png), black_box(&full), StlFormat::Binary, &token).unwrap()
        });
    });

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    let png = disc_png(256);
    let params = KeychainParams::default();
    let token = CancelToken::new();
    let model = generate(&png, &params, StlFormat::Binary, &token).unwrap();
    let mesh = keyforge::import_stl(&model.bytes).unwrap();

    group.bench_function("binary", |b| {
        b.iter(|| keyforge::export_stl(black_box(&mesh), StlFormat::Binary));
    });
    group.bench_function("ascii", |b| {
        b.iter(|| keyforge::export_stl(black_box(&mesh), StlFormat::Ascii));
    });

    group.finish();
}

criterion_group!(benches, bench_trace, bench_generate, bench_export);
criterion_main!(benches);
