// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! TrueType outline provider
//!
//! Loads a system font file per requested style and flattens its quadratic
//! and cubic curves into polylines. Font availability is probed at load
//! time; when no candidate file exists the library falls back to the
//! bundled bitmap font.

use super::{GlyphOutline, OutlineProvider};
use crate::contour::Contour;
use crate::params::FontStyle;
use nalgebra::Point2;
use std::path::Path;
use ttf_parser::{Face, OutlineBuilder};

/// Segments per quadratic curve; cubics get twice as many.
const CURVE_STEPS: usize = 8;

/// Candidate font files per style, most specific first.
fn candidate_paths(style: FontStyle) -> &'static [&'static str] {
    match style {
        FontStyle::Arial => &[
            "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        ],
        FontStyle::Helvetica => &[
            "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        ],
        FontStyle::Times => &[
            "/usr/share/fonts/truetype/msttcorefonts/Times_New_Roman.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
        ],
        FontStyle::Courier => &[
            "/usr/share/fonts/truetype/msttcorefonts/Courier_New.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        ],
    }
}

pub struct TrueTypeFont {
    data: Vec<u8>,
    name: String,
}

impl TrueTypeFont {
    /// Probe the filesystem for a usable font file for `style`.
    pub fn load(style: FontStyle) -> Option<TrueTypeFont> {
        for path in candidate_paths(style) {
            if !Path::new(path).is_file() {
                continue;
            }
            let Ok(data) = std::fs::read(path) else {
                continue;
            };
            if Face::parse(&data, 0).is_ok() {
                tracing::debug!(style = style.as_str(), path, "loaded system font");
                return Some(TrueTypeFont {
                    data,
                    name: path.to_string(),
                });
            }
        }
        tracing::debug!(style = style.as_str(), "no system font found");
        None
    }
}

impl OutlineProvider for TrueTypeFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn glyph(&self, c: char) -> Option<GlyphOutline> {
        // Face borrows the byte buffer, so it is reparsed per glyph rather
        // than stored alongside it. Parsing is table-header validation
        // only and is cheap next to outline flattening.
        let face = Face::parse(&self.data, 0).ok()?;
        let glyph_id = face.glyph_index(c)?;
        let upem = face.units_per_em() as f64;

        let mut sink = PathSink::new(1.0 / upem);
        face.outline_glyph(glyph_id, &mut sink)?;
        let contours = sink.finish();
        if contours.is_empty() {
            return None;
        }
        let advance = face.glyph_hor_advance(glyph_id)? as f64 / upem;
        Some(GlyphOutline { contours, advance })
    }
}

/// Flattens ttf path commands into closed polylines in em units.
struct PathSink {
    scale: f64,
    current: Vec<Point2<f64>>,
    done: Vec<Contour>,
}

impl PathSink {
    fn new(scale: f64) -> PathSink {
        PathSink {
            scale,
            current: Vec::new(),
            done: Vec::new(),
        }
    }

    fn push(&mut self, x: f32, y: f32) {
        self.current
            .push(Point2::new(x as f64 * self.scale, y as f64 * self.scale));
    }

    fn finish(mut self) -> Vec<Contour> {
        self.flush();
        self.done
    }

    fn flush(&mut self) {
        if self.current.len() >= 3 {
            self.done.push(Contour::new(std::mem::take(&mut self.current)));
        } else {
            self.current.clear();
        }
    }

    fn last(&self) -> (f32, f32) {
        let p = self.current.last().copied().unwrap_or_else(Point2::origin);
        ((p.x / self.scale) as f32, (p.y / self.scale) as f32)
    }
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.push(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x0, y0) = self.last();
        for i in 1..=CURVE_STEPS {
            let t = i as f32 / CURVE_STEPS as f32;
            let u = 1.0 - t;
            let bx = u * u * x0 + 2.0 * u * t * x1 + t * t * x;
            let by = u * u * y0 + 2.0 * u * t * y1 + t * t * y;
            self.push(bx, by);
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x0, y0) = self.last();
        let steps = CURVE_STEPS * 2;
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let u = 1.0 - t;
            let bx = u.powi(3) * x0
                + 3.0 * u * u * t * x1
                + 3.0 * u * t * t * x2
                + t.powi(3) * x;
            let by = u.powi(3) * y0
                + 3.0 * u * u * t * y1
                + 3.0 * u * t * t * y2
                + t.powi(3) * y;
            self.push(bx, by);
        }
    }

    fn close(&mut self) {
        self.flush();
    }
}
