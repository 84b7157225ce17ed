// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! End-to-end generation scenarios

use anyhow::Result;
use image::{DynamicImage, GrayImage, Luma};
use keyforge::{generate, CancelToken, KeychainParams, ModelCache, StlFormat};

/// Honor RUST_LOG when debugging a failing scenario.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// PNG of a black square centered on a white canvas.
fn black_square_png(canvas: u32, margin: u32) -> Result<Vec<u8>> {
    let mut img = GrayImage::from_pixel(canvas, canvas, Luma([255u8]));
    for y in margin..canvas - margin {
        for x in margin..canvas - margin {
            img.put_pixel(x, y, Luma([0u8]));
        }
    }
    let mut bytes = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img).write_to(&mut bytes, image::ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

#[test]
fn test_black_square_becomes_slab_with_hole() -> Result<()> {
    init_logging();
    // 100x100 black square, default parameters: 5mm slab, centered
    // 4mm hole punched through.
    let png = black_square_png(120, 10)?;
    let params = KeychainParams::default();

    let model = generate(&png, &params, StlFormat::Binary, &CancelToken::new())?;

    println!(
        "slab: {} triangles, volume {:.1} mm^3",
        model.stats.triangle_count, model.stats.volume
    );
    assert!(model.stats.is_watertight);

    // Footprint scaled to 40x40 mm, z from 0 to 5.
    assert!((model.stats.bbox[3] - model.stats.bbox[0] - 40.0).abs() < 1e-6);
    assert!((model.stats.bbox[4] - model.stats.bbox[1] - 40.0).abs() < 1e-6);
    assert!((model.stats.bbox[5] - 5.0).abs() < 1e-9);

    // Hole removes roughly pi * r^2 * h of material.
    let slab = 40.0 * 40.0 * 5.0;
    let hole = std::f64::consts::PI * 2.0 * 2.0 * 5.0;
    assert!(model.stats.volume < slab - hole * 0.9);
    assert!(model.stats.volume > slab - hole * 1.1);
    Ok(())
}

#[test]
fn test_no_hole_means_solid_slab() -> Result<()> {
    let png = black_square_png(120, 10)?;
    let mut params = KeychainParams::default();
    params.has_hole = false;

    let model = generate(&png, &params, StlFormat::Binary, &CancelToken::new())?;
    assert!((model.stats.volume - 40.0 * 40.0 * 5.0).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_empty_text_equals_base_only() -> Result<()> {
    let png = black_square_png(120, 10)?;
    let mut base_only = KeychainParams::default();
    base_only.has_hole = false;

    let mut with_empty_text = base_only.clone();
    with_empty_text.text = "   ".into();

    let a = generate(&png, &base_only, StlFormat::Binary, &CancelToken::new())?;
    let b = generate(&png, &with_empty_text, StlFormat::Binary, &CancelToken::new())?;
    assert_eq!(a.bytes, b.bytes, "whitespace label must not change the model");
    Ok(())
}

#[test]
fn test_embossed_text_raises_top() -> Result<()> {
    let png = black_square_png(120, 10)?;
    let mut params = KeychainParams::default();
    params.has_hole = false;
    params.text = "KEY".into();
    params.text_height = 2.0;

    let model = generate(&png, &params, StlFormat::Binary, &CancelToken::new())?;
    assert!(model.stats.is_watertight);
    assert!((model.stats.bbox[5] - 7.0).abs() < 1e-9, "text top at 5 + 2 mm");
    assert!(model.stats.volume > 40.0 * 40.0 * 5.0);
    Ok(())
}

#[test]
fn test_corner_hole_rejected() -> Result<()> {
    let png = black_square_png(120, 10)?;
    let mut params = KeychainParams::default();
    params.hole_x = 0.0;
    params.hole_y = 0.0;

    let err = generate(&png, &params, StlFormat::Binary, &CancelToken::new()).unwrap_err();
    assert_eq!(err.kind(), "HoleOutOfBoundsError");
    assert_eq!(err.status(), 400);
    Ok(())
}

#[test]
fn test_blank_image_rejected() -> Result<()> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    let img = GrayImage::from_pixel(64, 64, Luma([255u8]));
    DynamicImage::ImageLuma8(img).write_to(&mut bytes, image::ImageFormat::Png)?;

    let err = generate(
        &bytes.into_inner(),
        &KeychainParams::default(),
        StlFormat::Binary,
        &CancelToken::new(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "EmptyImageError");
    Ok(())
}

#[test]
fn test_out_of_range_params_clamped() -> Result<()> {
    let png = black_square_png(120, 10)?;
    let mut params = KeychainParams::default();
    params.base_thickness = 100.0; // clamps to 10
    params.has_hole = false;

    let model = generate(&png, &params, StlFormat::Binary, &CancelToken::new())?;
    assert!((model.stats.bbox[5] - 10.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_cache_returns_identical_bytes() -> Result<()> {
    let png = black_square_png(100, 10)?;
    let params = KeychainParams::default();
    let cache = ModelCache::new();
    let token = CancelToken::new();

    let first = cache.get_or_generate(&png, &params, StlFormat::Binary, &token)?;
    let second = cache.get_or_generate(&png, &params, StlFormat::Binary, &token)?;
    assert_eq!(first.bytes, second.bytes);
    assert_eq!(cache.len(), 1);

    // Different parameters miss the cache.
    let mut other = params.clone();
    other.text = "X".into();
    cache.get_or_generate(&png, &other, StlFormat::Binary, &token)?;
    assert_eq!(cache.len(), 2);
    Ok(())
}

#[test]
fn test_cancellation_surfaces_as_cancelled() -> Result<()> {
    let png = black_square_png(100, 10)?;
    let token = CancelToken::new();
    token.cancel();

    let err = generate(&png, &KeychainParams::default(), StlFormat::Binary, &token).unwrap_err();
    assert_eq!(err.kind(), "CancelledError");
    assert_eq!(err.status(), 499);
    Ok(())
}
