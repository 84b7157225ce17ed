// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Generation pipeline
//!
//! Trace -> simplify -> scale, then text layout and hole planning side by
//! side, then solid assembly and STL export. The hole is validated
//! against the base silhouette inside the parallel stage; the hole/text
//! overlap check needs both results and runs after the join.

use crate::cancel::CancelToken;
use crate::contour::{simplify, Contour, Region, SIMPLIFY_TOLERANCE_PX};
use crate::error::GenerateError;
use crate::geometry::{analytics, GeometryStats};
use crate::hole;
use crate::io::{export_stl, StlFormat};
use crate::params::KeychainParams;
use crate::text;
use crate::trace;

/// Longest side of the generated model, in mm.
pub const MAX_SIDE_MM: f64 = 40.0;

/// A finished export with its summary numbers.
#[derive(Debug, Clone)]
pub struct GeneratedModel {
    pub bytes: Vec<u8>,
    pub format: StlFormat,
    pub stats: GeometryStats,
}

/// Run the whole pipeline for one request.
pub fn generate(
    image_bytes: &[u8],
    params: &KeychainParams,
    format: StlFormat,
    cancel: &CancelToken,
) -> Result<GeneratedModel, GenerateError> {
    let span = tracing::debug_span!("generate", format = format.as_str());
    let _guard = span.enter();
    let params = params.normalized();

    cancel.check("decode")?;
    let image = trace::decode(image_bytes)?;

    cancel.check("trace")?;
    let traced = trace::trace(&image)?;

    cancel.check("simplify")?;
    let simplified = simplify(&traced, SIMPLIFY_TOLERANCE_PX);

    let base = select_base_region(simplified.fit_to_mm(MAX_SIDE_MM))?;

    cancel.check("layout")?;
    let (text_result, hole_result) = rayon::join(
        || text::layout_text(&params.text, params.font_style, &base.bounds()),
        || -> Result<Option<Contour>, GenerateError> {
            if params.has_hole {
                hole::plan_hole(params.hole_x, params.hole_y, &base).map(Some)
            } else {
                Ok(None)
            }
        },
    );
    let text_loops = text_result?;
    let keyring_hole = hole_result?;
    if let Some(ref hole_loop) = keyring_hole {
        hole::ensure_clear_of_text(hole_loop, &text_loops)?;
    }

    cancel.check("build")?;
    let mesh = crate::solid::build_solid(
        &base,
        keyring_hole.as_ref(),
        text_loops,
        params.base_thickness,
        params.text_height,
    )?;

    cancel.check("export")?;
    let stats = analytics::analyze(&mesh);
    let bytes = export_stl(&mesh, format);
    tracing::debug!(
        triangles = stats.triangle_count,
        bytes = bytes.len(),
        "export complete"
    );
    Ok(GeneratedModel {
        bytes,
        format,
        stats,
    })
}

/// A keychain is one connected part: keep the largest traced region and
/// warn about the rest.
fn select_base_region(set: crate::contour::ContourSet) -> Result<Region, GenerateError> {
    let mut regions = set.into_regions();
    if regions.is_empty() {
        return Err(GenerateError::EmptyImage(
            "traced image produced no usable region".into(),
        ));
    }
    if regions.len() > 1 {
        tracing::warn!(
            regions = regions.len(),
            "image has multiple disjoint shapes, keeping the largest"
        );
    }
    regions.sort_by(|a, b| b.area().total_cmp(&a.area()));
    Ok(regions.swap_remove(0))
}
