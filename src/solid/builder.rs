// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Solid builder: base plate, keyring hole and embossed text
//!
//! Every part of the model is a Z-aligned prism, so the union of base
//! and text and the subtraction of the hole are carried out exactly on
//! the 2D profiles. The base top cap is emitted with the text footprints
//! cut out, text walls rise from that cut edge, and glyph counters are
//! re-capped at base height. No 3D boolean runs anywhere, and the result
//! is watertight by construction; validation at the end is a guard
//! against degenerate input loops, not a repair step.

use super::extrude::{extrude_walls, triangulate_cap, VertexPool};
use crate::contour::{Contour, ContourSet, Region};
use crate::error::GenerateError;
use crate::geometry::{analytics, validate, Mesh};

/// A shrunk label may not drop below this fraction of its laid-out size
/// while being fitted inside the silhouette.
const TEXT_MIN_RESCALE: f64 = 0.4;
/// Shrink step per fitting attempt.
const TEXT_RESCALE_STEP: f64 = 0.9;
/// Margin kept between text and the silhouette boundary, in mm.
const TEXT_MARGIN_MM: f64 = 0.25;

/// Assemble the final solid.
///
/// `base` is the traced silhouette with image holes, wound outer-CCW
/// holes-CW. `keyring_hole` is a clockwise loop already validated
/// against the base. `text_loops` are glyph loops in model coordinates;
/// they are grouped into regions and, when they stick out of the
/// silhouette, shrunk about their center down to a floor before the
/// build fails.
pub fn build_solid(
    base: &Region,
    keyring_hole: Option<&Contour>,
    text_loops: Vec<Contour>,
    base_thickness: f64,
    text_height: f64,
) -> Result<Mesh, GenerateError> {
    let mut base_holes: Vec<&Contour> = base.holes.iter().collect();
    if let Some(hole) = keyring_hole {
        base_holes.push(hole);
    }

    let text_regions = fit_text(text_loops, base, keyring_hole)?;
    tracing::debug!(
        text_regions = text_regions.len(),
        base_holes = base_holes.len(),
        "building solid"
    );

    let mut mesh = Mesh::with_capacity(1024, 2048);
    let mut pool = VertexPool::new();

    // Bottom cap at z = 0, facing down.
    triangulate_cap(&mut mesh, &mut pool, &base.outer, &base_holes, 0.0, false)?;

    // Top cap at base height with the text footprints cut out.
    let mut top_holes: Vec<&Contour> = base_holes.clone();
    let mut flipped_text_outers: Vec<Contour> = Vec::new();
    for region in &text_regions {
        let mut outer = region.outer.clone();
        outer.orient(false);
        flipped_text_outers.push(outer);
    }
    top_holes.extend(flipped_text_outers.iter());
    triangulate_cap(
        &mut mesh,
        &mut pool,
        &base.outer,
        &top_holes,
        base_thickness,
        true,
    )?;

    // Glyph counters expose the base top again inside the footprint.
    for region in &text_regions {
        for counter in &region.holes {
            let mut island = counter.clone();
            island.orient(true);
            triangulate_cap(&mut mesh, &mut pool, &island, &[], base_thickness, true)?;
        }
    }

    // Base walls over the full thickness.
    extrude_walls(&mut mesh, &mut pool, &base.outer, 0.0, base_thickness);
    for hole in &base_holes {
        extrude_walls(&mut mesh, &mut pool, hole, 0.0, base_thickness);
    }

    // Text prisms from base top to text top.
    let text_top = base_thickness + text_height;
    for region in &text_regions {
        let counters: Vec<&Contour> = region.holes.iter().collect();
        triangulate_cap(&mut mesh, &mut pool, &region.outer, &counters, text_top, true)?;
        extrude_walls(&mut mesh, &mut pool, &region.outer, base_thickness, text_top);
        for counter in &region.holes {
            extrude_walls(&mut mesh, &mut pool, counter, base_thickness, text_top);
        }
    }

    mesh.remove_degenerate_triangles();

    let validation = validate::validate_mesh(&mesh);
    if !validation.is_manifold || !validation.is_closed {
        return Err(GenerateError::NonManifoldResult(format!(
            "{} boundary edges, manifold={}",
            validation.boundary_edge_count, validation.is_manifold
        )));
    }
    let volume = analytics::volume(&mesh);
    if volume <= 0.0 {
        return Err(GenerateError::DegenerateGeometry(format!(
            "solid volume {volume:.3} mm^3"
        )));
    }
    tracing::debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        volume,
        "solid assembled"
    );
    Ok(mesh)
}

/// Group glyph loops into regions and make sure every one sits strictly
/// inside the silhouette, clear of the keyring hole. Regions that stick
/// out are shrunk about the label center in steps, down to a floor.
fn fit_text(
    text_loops: Vec<Contour>,
    base: &Region,
    keyring_hole: Option<&Contour>,
) -> Result<Vec<Region>, GenerateError> {
    if text_loops.is_empty() {
        return Ok(Vec::new());
    }
    let mut loops = text_loops;
    let center = {
        let mut bounds = crate::contour::Rect2::empty();
        for contour in &loops {
            for p in &contour.points {
                bounds.expand_to_include(*p);
            }
        }
        bounds.center()
    };

    let mut scale = 1.0f64;
    loop {
        if text_fits(&loops, base, keyring_hole) {
            break;
        }
        scale *= TEXT_RESCALE_STEP;
        if scale < TEXT_MIN_RESCALE {
            return Err(GenerateError::DegenerateGeometry(
                "text cannot fit inside the silhouette".into(),
            ));
        }
        for contour in &mut loops {
            contour.scale_about(center, TEXT_RESCALE_STEP);
        }
    }
    if scale < 1.0 {
        tracing::debug!(scale, "shrank text to fit silhouette");
    }

    let regions = ContourSet::new(loops).into_regions();
    if regions.is_empty() {
        return Err(GenerateError::DegenerateGeometry(
            "text loops formed no regions".into(),
        ));
    }
    Ok(regions)
}

/// Strict containment check: every text vertex and segment midpoint must
/// be inside the silhouette with a margin, and outside the keyring hole.
fn text_fits(loops: &[Contour], base: &Region, keyring_hole: Option<&Contour>) -> bool {
    for contour in loops {
        let n = contour.len();
        for i in 0..n {
            let p = contour.points[i];
            let q = contour.points[(i + 1) % n];
            let mid = nalgebra::Point2::new((p.x + q.x) * 0.5, (p.y + q.y) * 0.5);
            for point in [p, mid] {
                if !base.contains(point) {
                    return false;
                }
                if base.distance_to_boundary(point) < TEXT_MARGIN_MM {
                    return false;
                }
                if let Some(hole) = keyring_hole {
                    if hole.contains(point)
                        || hole.distance_to_boundary(point) < TEXT_MARGIN_MM
                    {
                        return false;
                    }
                }
            }
        }
    }
    true
}
