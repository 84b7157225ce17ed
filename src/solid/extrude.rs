// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Prism extrusion primitives
//!
//! Caps and walls are emitted into a shared, coordinate-interned vertex
//! pool. A cap triangulated from the same loop a wall was extruded from
//! therefore reuses the wall's vertex indices exactly, which is what
//! makes the edge-shared-by-two-triangles property hold at the seams.

use crate::contour::Contour;
use crate::error::GenerateError;
use crate::geometry::{Mesh, Triangle};
use nalgebra::Point3;
use std::collections::HashMap;

/// Coordinate quantum for vertex interning. Loops feed the same f64
/// values into caps and walls, so this only has to absorb bit-identical
/// inputs; it is far below print resolution.
const POOL_EPS: f64 = 1e-9;

/// Interns positions so identical coordinates map to one mesh vertex.
pub struct VertexPool {
    map: HashMap<(i64, i64, i64), usize>,
}

impl VertexPool {
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    pub fn intern(&mut self, mesh: &mut Mesh, p: Point3<f64>) -> usize {
        let key = (
            (p.x / POOL_EPS).round() as i64,
            (p.y / POOL_EPS).round() as i64,
            (p.z / POOL_EPS).round() as i64,
        );
        *self
            .map
            .entry(key)
            .or_insert_with(|| mesh.add_vertex(p))
    }
}

impl Default for VertexPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Triangulate a flat cap at height `z` and append it to the mesh.
///
/// `outer` must wind counter-clockwise and `holes` clockwise. When `up`
/// is true the cap faces +Z. Only loop vertices are used, so cap
/// boundary edges coincide with wall edges extruded from the same loops.
pub fn triangulate_cap(
    mesh: &mut Mesh,
    pool: &mut VertexPool,
    outer: &Contour,
    holes: &[&Contour],
    z: f64,
    up: bool,
) -> Result<(), GenerateError> {
    let mut flat: Vec<f64> = Vec::with_capacity((outer.len() + holes.iter().map(|h| h.len()).sum::<usize>()) * 2);
    let mut hole_starts: Vec<usize> = Vec::with_capacity(holes.len());
    for p in &outer.points {
        flat.push(p.x);
        flat.push(p.y);
    }
    for hole in holes {
        hole_starts.push(flat.len() / 2);
        for p in &hole.points {
            flat.push(p.x);
            flat.push(p.y);
        }
    }

    let triangles = earcutr::earcut(&flat, &hole_starts, 2).map_err(|e| {
        GenerateError::DegenerateGeometry(format!("cap triangulation failed: {e:?}"))
    })?;
    if triangles.is_empty() {
        return Err(GenerateError::DegenerateGeometry(
            "cap triangulation produced no triangles".into(),
        ));
    }

    let point_at = |i: usize| Point3::new(flat[i * 2], flat[i * 2 + 1], z);
    for tri in triangles.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let pa = point_at(a);
        let pb = point_at(b);
        let pc = point_at(c);
        // Signed 2D area; earcut winding is not relied on.
        let cross = (pb.x - pa.x) * (pc.y - pa.y) - (pb.y - pa.y) * (pc.x - pa.x);
        if cross.abs() < 1e-12 {
            continue;
        }
        let ia = pool.intern(mesh, pa);
        let ib = pool.intern(mesh, pb);
        let ic = pool.intern(mesh, pc);
        let ccw = cross > 0.0;
        let indices = if ccw == up { [ia, ib, ic] } else { [ia, ic, ib] };
        mesh.add_triangle(Triangle::new(indices));
    }
    Ok(())
}

/// Extrude the wall of one loop between two heights.
///
/// With a counter-clockwise outer loop the wall faces outward; with a
/// clockwise hole loop it faces into the hole. Same rule either way:
/// normals point to the right of the walk direction.
pub fn extrude_walls(
    mesh: &mut Mesh,
    pool: &mut VertexPool,
    loop_: &Contour,
    z0: f64,
    z1: f64,
) {
    let n = loop_.len();
    for i in 0..n {
        let p = loop_.points[i];
        let q = loop_.points[(i + 1) % n];
        let p0 = pool.intern(mesh, Point3::new(p.x, p.y, z0));
        let q0 = pool.intern(mesh, Point3::new(q.x, q.y, z0));
        let q1 = pool.intern(mesh, Point3::new(q.x, q.y, z1));
        let p1 = pool.intern(mesh, Point3::new(p.x, p.y, z1));
        mesh.add_triangle(Triangle::new([p0, q0, q1]));
        mesh.add_triangle(Triangle::new([p0, q1, p1]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::validate;
    use nalgebra::Point2;

    fn square(side: f64) -> Contour {
        Contour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(side, 0.0),
            Point2::new(side, side),
            Point2::new(0.0, side),
        ])
    }

    #[test]
    fn test_box_prism_watertight() {
        let outer = square(10.0);
        let mut mesh = Mesh::new();
        let mut pool = VertexPool::new();
        triangulate_cap(&mut mesh, &mut pool, &outer, &[], 0.0, false).unwrap();
        triangulate_cap(&mut mesh, &mut pool, &outer, &[], 5.0, true).unwrap();
        extrude_walls(&mut mesh, &mut pool, &outer, 0.0, 5.0);

        let validation = validate::validate_mesh(&mesh);
        assert!(validation.is_ok(), "{validation:?}");
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        let vol = crate::geometry::analytics::volume(&mesh);
        assert!((vol - 500.0).abs() < 1e-9, "volume {vol}");
    }

    #[test]
    fn test_prism_with_hole_watertight() {
        let outer = square(10.0);
        let mut inner = Contour::new(vec![
            Point2::new(3.0, 3.0),
            Point2::new(7.0, 3.0),
            Point2::new(7.0, 7.0),
            Point2::new(3.0, 7.0),
        ]);
        inner.orient(false);

        let mut mesh = Mesh::new();
        let mut pool = VertexPool::new();
        triangulate_cap(&mut mesh, &mut pool, &outer, &[&inner], 0.0, false).unwrap();
        triangulate_cap(&mut mesh, &mut pool, &outer, &[&inner], 2.0, true).unwrap();
        extrude_walls(&mut mesh, &mut pool, &outer, 0.0, 2.0);
        extrude_walls(&mut mesh, &mut pool, &inner, 0.0, 2.0);

        let validation = validate::validate_mesh(&mesh);
        assert!(validation.is_ok(), "{validation:?}");
        let vol = crate::geometry::analytics::volume(&mesh);
        assert!((vol - (100.0 - 16.0) * 2.0).abs() < 1e-9, "volume {vol}");
    }

    #[test]
    fn test_cap_normals_face_requested_side() {
        let outer = square(4.0);
        let mut mesh = Mesh::new();
        let mut pool = VertexPool::new();
        triangulate_cap(&mut mesh, &mut pool, &outer, &[], 1.0, true).unwrap();
        for i in 0..mesh.triangle_count() {
            assert!(mesh.face_normal(i).z > 0.99);
        }
    }

    #[test]
    fn test_wall_normals_point_outward() {
        let outer = square(4.0);
        let mut mesh = Mesh::new();
        let mut pool = VertexPool::new();
        extrude_walls(&mut mesh, &mut pool, &outer, 0.0, 1.0);
        let center = Point3::new(2.0, 2.0, 0.5);
        for i in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangles[i].indices;
            let centroid = (mesh.positions[a].coords
                + mesh.positions[b].coords
                + mesh.positions[c].coords)
                / 3.0;
            let away = centroid - center.coords;
            assert!(mesh.face_normal(i).dot(&away) > 0.0);
        }
    }

    #[test]
    fn test_pool_interns_identical_coordinates() {
        let mut mesh = Mesh::new();
        let mut pool = VertexPool::new();
        let a = pool.intern(&mut mesh, Point3::new(1.0, 2.0, 3.0));
        let b = pool.intern(&mut mesh, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(a, b);
        assert_eq!(mesh.vertex_count(), 1);
    }
}
