// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Hole planner: keyring hole placement and validation
//!
//! Places the circular keyring hole from percentage coordinates over the
//! base footprint bounding box and rejects positions that would cut the
//! silhouette edge or the embossed text.

use crate::contour::{Contour, Region};
use crate::error::GenerateError;
use nalgebra::Point2;

/// Hole diameter in mm.
pub const HOLE_DIAMETER_MM: f64 = 4.0;
/// Minimum wall between the hole and the silhouette boundary, in mm.
pub const HOLE_CLEARANCE_MM: f64 = 1.5;
/// Minimum gap between the hole and any text loop, in mm.
pub const TEXT_CLEARANCE_MM: f64 = 0.25;
/// Circle tessellation.
pub const HOLE_SEGMENTS: usize = 64;

/// Place the keyring hole and validate it against the base footprint.
///
/// `x_pct` and `y_pct` locate the hole center as percentages of the
/// footprint bounding box. The returned loop is clockwise, ready to be
/// punched into the base profile as an island-free hole.
pub fn plan_hole(x_pct: f64, y_pct: f64, base: &Region) -> Result<Contour, GenerateError> {
    let bounds = base.bounds();
    let center = Point2::new(
        bounds.min.x + bounds.width() * x_pct / 100.0,
        bounds.min.y + bounds.height() * y_pct / 100.0,
    );
    let radius = HOLE_DIAMETER_MM / 2.0;

    if !base.contains(center) {
        return Err(GenerateError::HoleOutOfBounds(format!(
            "hole center ({:.1}%, {:.1}%) lies outside the silhouette",
            x_pct, y_pct
        )));
    }
    let wall = base.distance_to_boundary(center);
    if wall < radius + HOLE_CLEARANCE_MM {
        return Err(GenerateError::HoleOutOfBounds(format!(
            "hole leaves a {:.2}mm wall, needs {:.2}mm",
            wall - radius,
            HOLE_CLEARANCE_MM
        )));
    }
    tracing::debug!(cx = center.x, cy = center.y, wall, "planned keyring hole");
    Ok(circle(center, radius))
}

/// Reject a hole that would touch or overlap any text loop. Checked after
/// hole planning and text layout complete.
pub fn ensure_clear_of_text(hole: &Contour, text_loops: &[Contour]) -> Result<(), GenerateError> {
    let bounds = hole.bounds();
    let center = bounds.center();
    let radius = bounds.width() / 2.0;
    for loop_ in text_loops {
        let overlapping = loop_.contains(center)
            || loop_.distance_to_boundary(center) < radius + TEXT_CLEARANCE_MM;
        if overlapping {
            return Err(GenerateError::HoleOutOfBounds(
                "hole overlaps the embossed text".into(),
            ));
        }
    }
    Ok(())
}

/// Clockwise circle, closed implicitly.
fn circle(center: Point2<f64>, radius: f64) -> Contour {
    let mut points = Vec::with_capacity(HOLE_SEGMENTS);
    for i in 0..HOLE_SEGMENTS {
        let angle = -2.0 * std::f64::consts::PI * i as f64 / HOLE_SEGMENTS as f64;
        points.push(Point2::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        ));
    }
    let mut c = Contour::new(points);
    c.orient(false);
    c
}
