// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! 2D contour types shared by the tracer, text generator and solid builder
//!
//! A [`Contour`] is an implicitly-closed loop of points. Orientation is
//! significant everywhere downstream: after [`ContourSet::into_regions`]
//! every outer loop is counter-clockwise and every hole loop is clockwise,
//! and the extruder relies on that to get outward wall normals.

mod simplify;

pub use simplify::{simplify, SIMPLIFY_TOLERANCE_PX};

use nalgebra::Point2;

/// Minimum enclosed area (in the contour's own units) below which a loop is
/// considered degenerate and dropped.
pub const MIN_LOOP_AREA: f64 = 4.0;

/// Closed polyline in 2D. The last point connects back to the first; no
/// explicit duplicate closing point is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point2<f64>>,
}

impl Contour {
    pub fn new(points: Vec<Point2<f64>>) -> Self {
        let mut c = Self { points };
        c.dedup_points();
        c
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.len() < 3
    }

    /// Shoelace signed area. Positive for counter-clockwise loops.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            sum += p.x * q.y - q.x * p.y;
        }
        sum * 0.5
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Force the requested orientation in place.
    pub fn orient(&mut self, ccw: bool) {
        if self.is_ccw() != ccw {
            self.reverse();
        }
    }

    pub fn bounds(&self) -> Rect2 {
        Rect2::from_points(&self.points)
    }

    /// Even-odd point-in-polygon test. Points exactly on the boundary are
    /// not guaranteed either way.
    pub fn contains(&self, p: Point2<f64>) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Shortest distance from `p` to the contour boundary.
    pub fn distance_to_boundary(&self, p: Point2<f64>) -> f64 {
        let n = self.points.len();
        let mut best = f64::INFINITY;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            best = best.min(point_segment_distance(p, a, b));
        }
        best
    }

    /// A point guaranteed to be strictly inside the loop (for containment
    /// depth tests). Uses the midpoint of the widest horizontal span through
    /// the centroid row.
    pub fn interior_point(&self) -> Option<Point2<f64>> {
        if self.is_empty() {
            return None;
        }
        let b = self.bounds();
        let y = (b.min.y + b.max.y) * 0.5;
        // Collect x crossings of the horizontal line at y.
        let n = self.points.len();
        let mut xs = Vec::new();
        for i in 0..n {
            let a = self.points[i];
            let c = self.points[(i + 1) % n];
            if (a.y > y) != (c.y > y) {
                xs.push((c.x - a.x) * (y - a.y) / (c.y - a.y) + a.x);
            }
        }
        xs.sort_by(|p, q| p.partial_cmp(q).unwrap_or(std::cmp::Ordering::Equal));
        // Pick the widest inside span.
        let mut best: Option<(f64, f64)> = None;
        for pair in xs.chunks(2) {
            if let [x0, x1] = pair {
                let width = x1 - x0;
                if best.map_or(true, |(_, w)| width > w) {
                    best = Some(((x0 + x1) * 0.5, width));
                }
            }
        }
        best.map(|(x, _)| Point2::new(x, y))
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }

    /// Uniform scale about a fixed point.
    pub fn scale_about(&mut self, center: Point2<f64>, factor: f64) {
        for p in &mut self.points {
            p.x = center.x + (p.x - center.x) * factor;
            p.y = center.y + (p.y - center.y) * factor;
        }
    }

    fn dedup_points(&mut self) {
        self.points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12);
        if self.points.len() > 1 {
            let first = self.points[0];
            let last = *self.points.last().unwrap();
            if (first.x - last.x).abs() < 1e-12 && (first.y - last.y).abs() < 1e-12 {
                self.points.pop();
            }
        }
    }
}

/// Axis-aligned 2D bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect2 {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Rect2 {
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Point2<f64>]) -> Self {
        let mut r = Self::empty();
        for p in points {
            r.expand_to_include(*p);
        }
        r
    }

    pub fn expand_to_include(&mut self, p: Point2<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(&self, other: &Rect2) -> Rect2 {
        let mut r = *self;
        r.expand_to_include(other.min);
        r.expand_to_include(other.max);
        r
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

}

/// One silhouette: a flat list of loops, holes not yet paired with their
/// outers. Produced by the tracer and the glyph flattener.
#[derive(Debug, Clone, Default)]
pub struct ContourSet {
    pub contours: Vec<Contour>,
}

impl ContourSet {
    pub fn new(contours: Vec<Contour>) -> Self {
        Self { contours }
    }

    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(Contour::is_empty)
    }

    pub fn bounds(&self) -> Rect2 {
        let mut r = Rect2::empty();
        for c in &self.contours {
            r = r.union(&c.bounds());
        }
        r
    }

    /// Map image-space loops (pixels, Y down) into model space (mm, Y up),
    /// scaling so the longest bounding-box side equals `max_side_mm` and the
    /// bbox minimum lands at the origin.
    pub fn fit_to_mm(&self, max_side_mm: f64) -> ContourSet {
        let b = self.bounds();
        let longest = b.width().max(b.height());
        if longest <= 0.0 {
            return self.clone();
        }
        let s = max_side_mm / longest;
        let contours = self
            .contours
            .iter()
            .map(|c| {
                Contour::new(
                    c.points
                        .iter()
                        .map(|p| Point2::new((p.x - b.min.x) * s, (b.max.y - p.y) * s))
                        .collect(),
                )
            })
            .collect();
        ContourSet::new(contours)
    }

    /// Group loops into outer-with-holes regions using the even-odd rule:
    /// a loop at even containment depth is an outer boundary, odd depth is a
    /// hole assigned to its immediate parent. Orientations are normalized
    /// (outer CCW, holes CW).
    pub fn into_regions(self) -> Vec<Region> {
        let loops: Vec<Contour> = self
            .contours
            .into_iter()
            .filter(|c| !c.is_empty() && c.area() > 0.0)
            .collect();

        // Containment depth and immediate parent per loop.
        let mut depth = vec![0usize; loops.len()];
        let mut parent = vec![None::<usize>; loops.len()];
        for i in 0..loops.len() {
            let Some(probe) = loops[i].interior_point() else {
                continue;
            };
            let mut best_area = f64::INFINITY;
            for j in 0..loops.len() {
                if i == j {
                    continue;
                }
                if loops[j].contains(probe) {
                    depth[i] += 1;
                    // Immediate parent is the smallest containing loop.
                    let a = loops[j].area();
                    if a < best_area {
                        best_area = a;
                        parent[i] = Some(j);
                    }
                }
            }
        }

        let mut regions: Vec<Region> = Vec::new();
        let mut region_of = vec![None::<usize>; loops.len()];
        for (i, c) in loops.iter().enumerate() {
            if depth[i] % 2 == 0 {
                let mut outer = c.clone();
                outer.orient(true);
                region_of[i] = Some(regions.len());
                regions.push(Region {
                    outer,
                    holes: Vec::new(),
                });
            }
        }
        for (i, c) in loops.iter().enumerate() {
            if depth[i] % 2 == 1 {
                if let Some(p) = parent[i] {
                    if let Some(r) = region_of[p] {
                        let mut hole = c.clone();
                        hole.orient(false);
                        regions[r].holes.push(hole);
                    }
                }
            }
        }
        regions
    }
}

/// One solid area: a CCW outer boundary with zero or more CW holes.
#[derive(Debug, Clone)]
pub struct Region {
    pub outer: Contour,
    pub holes: Vec<Contour>,
}

impl Region {
    /// Net enclosed area (outer minus holes).
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(Contour::area).sum();
        (self.outer.area() - holes).max(0.0)
    }

    pub fn bounds(&self) -> Rect2 {
        self.outer.bounds()
    }

    /// True if `p` lies in the solid part of the region.
    pub fn contains(&self, p: Point2<f64>) -> bool {
        self.outer.contains(p) && !self.holes.iter().any(|h| h.contains(p))
    }

    /// Shortest distance from `p` to any boundary loop of the region.
    pub fn distance_to_boundary(&self, p: Point2<f64>) -> f64 {
        let mut best = self.outer.distance_to_boundary(p);
        for h in &self.holes {
            best = best.min(h.distance_to_boundary(p));
        }
        best
    }
}

fn point_segment_distance(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= f64::EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    let proj = a + ab * t;
    (p - proj).norm()
}
