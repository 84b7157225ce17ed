// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Image tracer: raster bytes to closed 2D contours
//!
//! Binarizes the uploaded image (alpha channel when it carries one,
//! luminance otherwise) and walks the boundary of every foreground region
//! on the pixel lattice. Foreground is 4-connected: regions touching only
//! diagonally become separate loops. Nested holes (the inside of an "O")
//! come out as separate loops and are paired up later by
//! [`ContourSet::into_regions`].

use crate::contour::{Contour, ContourSet};
use crate::error::GenerateError;
use image::DynamicImage;
use nalgebra::Point2;

/// Luminance cutoff: darker pixels are foreground.
pub const LUMA_THRESHOLD: u8 = 128;
/// Alpha cutoff: opaque-enough pixels are foreground.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Decode uploaded bytes into an image.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, GenerateError> {
    image::load_from_memory(bytes)
        .map_err(|e| GenerateError::UnsupportedFormat(format!("image decode failed: {e}")))
}

/// Trace the silhouette of `img` into closed loops in pixel coordinates
/// (origin top-left, Y down).
pub fn trace(img: &DynamicImage) -> Result<ContourSet, GenerateError> {
    let grid = binarize(img);
    let foreground = grid.iter().flatten().filter(|&&b| b).count();
    if foreground == 0 {
        return Err(GenerateError::EmptyImage(
            "no foreground pixels above threshold".into(),
        ));
    }
    // Bridge diagonal checkerboard corners before walking; a loop pinched
    // at a lattice corner would extrude into a non-manifold wall edge.
    let bridged = connect_diagonals(&grid);
    let mut contours = trace_bitmap(&bridged);
    for c in &mut contours {
        for p in &mut c.points {
            p.x *= 0.5;
            p.y *= 0.5;
        }
    }
    tracing::debug!(
        width = img.width(),
        height = img.height(),
        foreground,
        loops = contours.len(),
        "traced image"
    );
    if contours.is_empty() {
        return Err(GenerateError::EmptyImage(
            "foreground regions all below minimum area".into(),
        ));
    }
    Ok(ContourSet::new(contours))
}

/// Binarize: when the image carries meaningful transparency, the shape is
/// whatever is opaque; otherwise it is whatever is dark.
fn binarize(img: &DynamicImage) -> Vec<Vec<bool>> {
    let rgba = img.to_rgba8();
    let (w, h) = (rgba.width() as usize, rgba.height() as usize);

    let has_transparency = rgba.pixels().any(|p| p.0[3] < 250);

    let mut grid = vec![vec![false; w]; h];
    for (x, y, p) in rgba.enumerate_pixels() {
        let [r, g, b, a] = p.0;
        let fg = if has_transparency {
            a >= ALPHA_THRESHOLD
        } else {
            // Rec. 601 luma.
            let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
            luma <= LUMA_THRESHOLD as u32
        };
        grid[y as usize][x as usize] = fg;
    }
    grid
}

/// Upscale a binary grid 2x and fill one sub-pixel at every diagonally
/// touching foreground pair, making the foreground 4-connected.
///
/// After this no lattice corner is a checkerboard, so every boundary loop
/// is simple and no two loops share a corner. Traced coordinates must be
/// divided by 2 to return to source pixels.
pub fn connect_diagonals(grid: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let h = grid.len();
    let w = if h > 0 { grid[0].len() } else { 0 };
    let at = |x: i64, y: i64| -> bool {
        x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h && grid[y as usize][x as usize]
    };

    let mut out = vec![vec![false; w * 2]; h * 2];
    for y in 0..h {
        for x in 0..w {
            if grid[y][x] {
                out[y * 2][x * 2] = true;
                out[y * 2][x * 2 + 1] = true;
                out[y * 2 + 1][x * 2] = true;
                out[y * 2 + 1][x * 2 + 1] = true;
            }
        }
    }
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            if !at(x, y) {
                continue;
            }
            // Down-right diagonal.
            if at(x + 1, y + 1) && !at(x + 1, y) && !at(x, y + 1) {
                out[(y * 2 + 2) as usize][(x * 2 + 1) as usize] = true;
            }
            // Down-left diagonal.
            if at(x - 1, y + 1) && !at(x - 1, y) && !at(x, y + 1) {
                out[(y * 2 + 2) as usize][(x * 2) as usize] = true;
            }
        }
    }
    out
}

/// Walk the boundary of every foreground region of a binary grid.
///
/// Each pixel is a unit square; boundary edges between foreground and
/// background are chained into closed loops. Collinear runs are merged as
/// the walk goes, so a staircase-free rectangle comes back with 4 points.
/// Loops with near-zero area are dropped.
///
/// Also used by the builtin font to turn glyph bitmaps into outlines.
pub fn trace_bitmap(grid: &[Vec<bool>]) -> Vec<Contour> {
    let h = grid.len();
    let w = if h > 0 { grid[0].len() } else { 0 };
    let at = |x: i64, y: i64| -> bool {
        x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h && grid[y as usize][x as usize]
    };

    // Directed boundary edges per pixel, walked clockwise around the pixel
    // square (in image coordinates): top edge runs +X, right edge +Y,
    // bottom edge -X, left edge -Y.
    use std::collections::HashMap;
    let mut outgoing: HashMap<(i64, i64), Vec<(i64, i64)>> = HashMap::new();
    let mut edge_count = 0usize;
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            if !at(x, y) {
                continue;
            }
            let mut push = |from: (i64, i64), to: (i64, i64)| {
                outgoing.entry(from).or_default().push(to);
                edge_count += 1;
            };
            if !at(x, y - 1) {
                push((x, y), (x + 1, y));
            }
            if !at(x + 1, y) {
                push((x + 1, y), (x + 1, y + 1));
            }
            if !at(x, y + 1) {
                push((x + 1, y + 1), (x, y + 1));
            }
            if !at(x - 1, y) {
                push((x, y + 1), (x, y));
            }
        }
    }

    let mut contours = Vec::new();
    let mut consumed = 0usize;
    // Deterministic start order: scan lattice points row-major.
    let mut starts: Vec<(i64, i64)> = outgoing.keys().copied().collect();
    starts.sort_unstable_by_key(|&(x, y)| (y, x));

    for start in starts {
        loop {
            let Some(first) = take_edge(&mut outgoing, &at, start, None) else {
                break;
            };
            let mut points: Vec<(i64, i64)> = vec![start];
            let mut prev = start;
            let mut current = first;
            while current != start {
                let dir = (current.0 - prev.0, current.1 - prev.1);
                let next = take_edge(&mut outgoing, &at, current, Some(dir))
                    .expect("boundary edges always chain into closed loops");
                // Merge collinear runs.
                let next_dir = (next.0 - current.0, next.1 - current.1);
                if next_dir == dir {
                    // Extend the current run instead of emitting a vertex.
                } else {
                    points.push(current);
                }
                prev = current;
                current = next;
                consumed += 1;
            }
            consumed += 1;
            // The closing edge may be collinear with the first run.
            if points.len() >= 2 {
                let dir_in = (start.0 - prev.0, start.1 - prev.1);
                let dir_out = (points[1].0 - start.0, points[1].1 - start.1);
                if dir_in == dir_out {
                    points.remove(0);
                }
            }
            let contour = Contour::new(
                points
                    .into_iter()
                    .map(|(x, y)| Point2::new(x as f64, y as f64))
                    .collect(),
            );
            if contour.area() > 0.5 {
                contours.push(contour);
            }
        }
    }
    debug_assert_eq!(consumed, edge_count);
    contours
}

/// Pop the next outgoing edge at `point`.
///
/// A lattice corner has two outgoing edges only when the surrounding 2x2
/// pixels form a diagonal pair. For a foreground diagonal we continue
/// around the pixel square that produced the incoming edge (keeping the
/// two regions in separate loops); for a background diagonal we turn the
/// other way (keeping the two holes in separate loops). Either way no loop
/// ever visits a corner twice.
fn take_edge(
    outgoing: &mut std::collections::HashMap<(i64, i64), Vec<(i64, i64)>>,
    at: &impl Fn(i64, i64) -> bool,
    point: (i64, i64),
    incoming_dir: Option<(i64, i64)>,
) -> Option<(i64, i64)> {
    let candidates = outgoing.get_mut(&point)?;
    if candidates.is_empty() {
        return None;
    }
    let pick = if candidates.len() == 1 {
        0
    } else if let Some(d) = incoming_dir {
        let (cx, cy) = point;
        // rot(d): +90 degrees, (x, y) -> (-y, x).
        let rot = (-d.1, d.0);
        let fg_diagonal = at(cx - 1, cy - 1) && at(cx, cy);
        let want = if fg_diagonal { rot } else { (-rot.0, -rot.1) };
        let target = (point.0 + want.0, point.1 + want.1);
        candidates.iter().position(|&to| to == target).unwrap_or(0)
    } else {
        0
    };
    Some(candidates.swap_remove(pick))
}
