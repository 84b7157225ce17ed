// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Polyline simplification for traced contours
//!
//! Douglas-Peucker per closed loop, followed by self-intersection cleanup.
//! If simplification drifts the enclosed area by more than
//! [`MAX_AREA_DRIFT`], the tolerance is halved and the loop is redone.

use super::{Contour, ContourSet, MIN_LOOP_AREA};
use nalgebra::Point2;

/// Default Douglas-Peucker tolerance, in pixels of the traced image.
pub const SIMPLIFY_TOLERANCE_PX: f64 = 0.75;

/// Maximum relative change of a loop's enclosed area allowed by
/// simplification.
pub const MAX_AREA_DRIFT: f64 = 0.02;

/// Simplify every loop of `set`. Output loop count never exceeds the input
/// count; loops that collapse below [`MIN_LOOP_AREA`] are dropped.
pub fn simplify(set: &ContourSet, tolerance: f64) -> ContourSet {
    let mut out = Vec::with_capacity(set.contours.len());
    for contour in &set.contours {
        if let Some(simplified) = simplify_loop(contour, tolerance) {
            out.push(simplified);
        }
    }
    tracing::debug!(
        input = set.contours.len(),
        output = out.len(),
        tolerance,
        "simplified contour set"
    );
    ContourSet::new(out)
}

fn simplify_loop(contour: &Contour, tolerance: f64) -> Option<Contour> {
    let original_area = contour.area();
    if original_area < MIN_LOOP_AREA {
        return None;
    }

    let mut tol = tolerance;
    for _ in 0..4 {
        let candidate = douglas_peucker_closed(&contour.points, tol);
        let candidate = untangle(Contour::new(candidate))?;
        let drift = (candidate.area() - original_area).abs() / original_area;
        if drift <= MAX_AREA_DRIFT {
            return Some(candidate);
        }
        tol *= 0.5;
    }
    // Tolerance exhausted; keep the untangled original rather than a loop
    // that lost area.
    untangle(contour.clone())
}

/// Douglas-Peucker on a closed loop: anchor at the two mutually farthest
/// points, simplify each half as an open chain, rejoin.
fn douglas_peucker_closed(points: &[Point2<f64>], tolerance: f64) -> Vec<Point2<f64>> {
    let n = points.len();
    if n <= 4 {
        return points.to_vec();
    }

    // Farthest point from index 0 splits the loop.
    let mut far = 1;
    let mut far_d = 0.0;
    for (i, p) in points.iter().enumerate().skip(1) {
        let d = (p - points[0]).norm_squared();
        if d > far_d {
            far_d = d;
            far = i;
        }
    }

    let first: Vec<Point2<f64>> = points[0..=far].to_vec();
    let mut second: Vec<Point2<f64>> = points[far..n].to_vec();
    second.push(points[0]);

    let mut out = douglas_peucker_open(&first, tolerance);
    let tail = douglas_peucker_open(&second, tolerance);
    // Skip the shared endpoints when rejoining.
    out.extend_from_slice(&tail[1..tail.len() - 1]);
    out
}

fn douglas_peucker_open(points: &[Point2<f64>], tolerance: f64) -> Vec<Point2<f64>> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let a = points[0];
    let b = *points.last().unwrap();

    let mut worst = 0;
    let mut worst_d = 0.0;
    for (i, p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = perpendicular_distance(*p, a, b);
        if d > worst_d {
            worst_d = d;
            worst = i;
        }
    }

    if worst_d <= tolerance {
        return vec![a, b];
    }

    let mut left = douglas_peucker_open(&points[..=worst], tolerance);
    let right = douglas_peucker_open(&points[worst..], tolerance);
    left.pop();
    left.extend(right);
    left
}

fn perpendicular_distance(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let ab = b - a;
    let len = ab.norm();
    if len <= f64::EPSILON {
        return (p - a).norm();
    }
    ((b.x - a.x) * (a.y - p.y) - (a.x - p.x) * (b.y - a.y)).abs() / len
}

/// Remove self-intersections by splitting at the crossing point and keeping
/// the sub-loop with the largest area; smaller sub-loops are simplification
/// artifacts and are discarded.
fn untangle(contour: Contour) -> Option<Contour> {
    let mut current = contour;
    // Bounded: every split strictly shrinks the loop.
    for _ in 0..current.points.len().max(8) {
        match first_self_intersection(&current) {
            None => break,
            Some((i, j, x)) => {
                let (a, b) = split_at(&current, i, j, x);
                current = if a.area() >= b.area() { a } else { b };
            }
        }
    }
    if current.area() >= MIN_LOOP_AREA {
        Some(current)
    } else {
        None
    }
}

/// First proper crossing between two non-adjacent segments, with the
/// intersection point.
fn first_self_intersection(c: &Contour) -> Option<(usize, usize, Point2<f64>)> {
    let n = c.points.len();
    if n < 4 {
        return None;
    }
    for i in 0..n {
        let a0 = c.points[i];
        let a1 = c.points[(i + 1) % n];
        for j in (i + 2)..n {
            // Segments sharing an endpoint never count as crossings.
            if i == 0 && j == n - 1 {
                continue;
            }
            let b0 = c.points[j];
            let b1 = c.points[(j + 1) % n];
            if let Some(x) = segment_crossing(a0, a1, b0, b1) {
                return Some((i, j, x));
            }
        }
    }
    None
}

/// Proper crossing point of two segments, excluding shared endpoints and
/// collinear overlap.
fn segment_crossing(
    a0: Point2<f64>,
    a1: Point2<f64>,
    b0: Point2<f64>,
    b1: Point2<f64>,
) -> Option<Point2<f64>> {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() < 1e-12 {
        return None;
    }
    let delta = b0 - a0;
    let t = (delta.x * d2.y - delta.y * d2.x) / denom;
    let u = (delta.x * d1.y - delta.y * d1.x) / denom;
    const EPS: f64 = 1e-9;
    if t > EPS && t < 1.0 - EPS && u > EPS && u < 1.0 - EPS {
        Some(Point2::new(a0.x + d1.x * t, a0.y + d1.y * t))
    } else {
        None
    }
}

/// Split a loop at a crossing between segment `i` and segment `j` into the
/// two sub-loops that meet at `x`.
fn split_at(c: &Contour, i: usize, j: usize, x: Point2<f64>) -> (Contour, Contour) {
    let n = c.points.len();
    // Sub-loop A: x, points (i+1 ..= j), back to x.
    let mut a = vec![x];
    let mut k = (i + 1) % n;
    loop {
        a.push(c.points[k]);
        if k == j {
            break;
        }
        k = (k + 1) % n;
    }
    // Sub-loop B: x, points (j+1 .. wraps .. i), back to x.
    let mut b = vec![x];
    let mut k = (j + 1) % n;
    loop {
        b.push(c.points[k]);
        if k == i {
            break;
        }
        k = (k + 1) % n;
    }
    (Contour::new(a), Contour::new(b))
}
