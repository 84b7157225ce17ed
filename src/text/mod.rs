// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Text engraver: label string to positioned outlines
//!
//! Converts the label into closed glyph outlines, scales them to fit the
//! traced base footprint and centers them on it. Outlines come from a
//! system TrueType font when one is installed, or from the bundled bitmap
//! font otherwise.

pub mod builtin;
pub mod truetype;

use crate::contour::{Contour, Rect2};
use crate::error::GenerateError;
use crate::params::FontStyle;
use nalgebra::Point2;
use std::sync::{Arc, OnceLock};

/// Raised text may span at most this fraction of the base width.
pub const TEXT_WIDTH_FRACTION: f64 = 0.8;
/// Raised text may span at most this fraction of the base height.
pub const TEXT_HEIGHT_FRACTION: f64 = 0.4;

/// Fraction of an em taken as nominal line height when fitting. Matches
/// the cap height of the bundled font.
const CAP_HEIGHT_EM: f64 = 0.7;

/// Closed outlines of one glyph in em units, baseline at y = 0, Y up.
/// Winding is not normalized here; loops are grouped into regions by the
/// solid builder.
pub struct GlyphOutline {
    pub contours: Vec<Contour>,
    pub advance: f64,
}

/// Source of glyph outlines. Implemented by the system TrueType loader
/// and the bundled bitmap font.
pub trait OutlineProvider: Send + Sync {
    fn name(&self) -> &str;
    /// Outline for one character, or `None` when the font has no usable
    /// shape for it.
    fn glyph(&self, c: char) -> Option<GlyphOutline>;
}

/// Lazily resolved provider per font style, shared across requests.
pub struct FontLibrary {
    providers: [OnceLock<Arc<dyn OutlineProvider>>; 4],
}

impl FontLibrary {
    /// Process-wide instance. Font files are probed once per style.
    pub fn shared() -> &'static FontLibrary {
        static LIBRARY: OnceLock<FontLibrary> = OnceLock::new();
        LIBRARY.get_or_init(|| FontLibrary {
            providers: [
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
            ],
        })
    }

    pub fn provider(&self, style: FontStyle) -> Arc<dyn OutlineProvider> {
        self.providers[style as usize]
            .get_or_init(|| match truetype::TrueTypeFont::load(style) {
                Some(font) => Arc::new(font),
                None => Arc::new(builtin::BuiltinFont),
            })
            .clone()
    }
}

/// Lay the label out over the base footprint.
///
/// Returns the glyph loops in model millimeters, scaled so the line fits
/// within [`TEXT_WIDTH_FRACTION`] of the base width and
/// [`TEXT_HEIGHT_FRACTION`] of the base height, centered on the footprint
/// bounding box. An empty or whitespace-only label produces no loops.
pub fn layout_text(
    text: &str,
    style: FontStyle,
    base_bounds: &Rect2,
) -> Result<Vec<Contour>, GenerateError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let provider = FontLibrary::shared().provider(style);
    layout_with(provider.as_ref(), text, base_bounds)
}

fn layout_with(
    provider: &dyn OutlineProvider,
    text: &str,
    base_bounds: &Rect2,
) -> Result<Vec<Contour>, GenerateError> {
    let mut loops: Vec<Contour> = Vec::new();
    let mut pen = 0.0f64;
    for c in text.chars() {
        if c == ' ' {
            pen += 0.5;
            continue;
        }
        match provider.glyph(c) {
            Some(glyph) => {
                for mut contour in glyph.contours {
                    contour.translate(pen, 0.0);
                    loops.push(contour);
                }
                pen += glyph.advance;
            }
            None => {
                // Placeholder box keeps the line metrics stable for
                // characters the font cannot draw.
                tracing::debug!(character = %c, font = provider.name(), "no outline, using placeholder");
                loops.push(placeholder_box(pen));
                pen += 0.6;
            }
        }
    }
    if loops.is_empty() {
        return Ok(Vec::new());
    }

    let raw = bounds_of(&loops);
    let raw_w = raw.width().max(f64::EPSILON);
    let raw_h = raw.height().max(CAP_HEIGHT_EM);
    let scale = (TEXT_WIDTH_FRACTION * base_bounds.width() / raw_w)
        .min(TEXT_HEIGHT_FRACTION * base_bounds.height() / raw_h);
    if !scale.is_finite() || scale <= 0.0 {
        return Err(GenerateError::DegenerateGeometry(
            "base footprint too small for text".into(),
        ));
    }

    let raw_center = raw.center();
    let target = base_bounds.center();
    for contour in &mut loops {
        for p in &mut contour.points {
            p.x = target.x + (p.x - raw_center.x) * scale;
            p.y = target.y + (p.y - raw_center.y) * scale;
        }
    }
    tracing::debug!(
        glyph_loops = loops.len(),
        scale,
        "laid out label over footprint"
    );
    Ok(loops)
}

fn bounds_of(loops: &[Contour]) -> Rect2 {
    let mut r = Rect2::empty();
    for contour in loops {
        for p in &contour.points {
            r.expand_to_include(*p);
        }
    }
    r
}

/// 0.5 x 0.7 em rectangle standing in for an undrawable character.
fn placeholder_box(pen: f64) -> Contour {
    Contour::new(vec![
        Point2::new(pen + 0.05, 0.0),
        Point2::new(pen + 0.55, 0.0),
        Point2::new(pen + 0.55, CAP_HEIGHT_EM),
        Point2::new(pen + 0.05, CAP_HEIGHT_EM),
    ])
}
