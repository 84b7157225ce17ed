// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Mesh validation
//!
//! Slicers reject meshes that are not watertight, so every generated
//! solid is checked here before export.

use super::Mesh;
use std::collections::HashMap;

/// Undirected edge, stored with the smaller index first so both windings
/// hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Edge {
    v0: usize,
    v1: usize,
}

impl Edge {
    fn new(v0: usize, v1: usize) -> Self {
        if v0 < v1 {
            Self { v0, v1 }
        } else {
            Self { v0: v1, v1: v0 }
        }
    }
}

fn edge_counts(mesh: &Mesh) -> HashMap<Edge, u32> {
    let mut counts: HashMap<Edge, u32> = HashMap::new();
    for triangle in &mesh.triangles {
        let [a, b, c] = triangle.indices;
        for edge in [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)] {
            *counts.entry(edge).or_insert(0) += 1;
        }
    }
    counts
}

/// Each edge shared by at most 2 triangles.
pub fn is_manifold(mesh: &Mesh) -> bool {
    edge_counts(mesh).values().all(|&count| count <= 2)
}

/// Each edge shared by exactly 2 triangles, i.e. watertight.
pub fn is_closed(mesh: &Mesh) -> bool {
    edge_counts(mesh).values().all(|&count| count == 2)
}

/// All triangles reference valid vertices and have non-zero area.
pub fn has_valid_triangles(mesh: &Mesh) -> bool {
    for (i, triangle) in mesh.triangles.iter().enumerate() {
        let [a, b, c] = triangle.indices;
        if a >= mesh.positions.len() || b >= mesh.positions.len() || c >= mesh.positions.len() {
            return false;
        }
        if a == b || b == c || a == c {
            return false;
        }
        let v0 = mesh.positions[a];
        let v1 = mesh.positions[b];
        let v2 = mesh.positions[c];
        let area = (v1 - v0).cross(&(v2 - v0)).norm();
        if area < 1e-10 {
            tracing::debug!(triangle = i, area, "degenerate triangle");
            return false;
        }
    }
    true
}

/// Validation report for a generated solid.
#[derive(Debug, Clone, Copy)]
pub struct MeshValidation {
    pub is_manifold: bool,
    pub is_closed: bool,
    pub has_valid_triangles: bool,
    pub edge_count: usize,
    pub boundary_edge_count: usize,
}

impl MeshValidation {
    pub fn is_ok(&self) -> bool {
        self.is_manifold && self.is_closed && self.has_valid_triangles
    }
}

pub fn validate_mesh(mesh: &Mesh) -> MeshValidation {
    let counts = edge_counts(mesh);
    let boundary_edge_count = counts.values().filter(|&&count| count == 1).count();

    MeshValidation {
        is_manifold: counts.values().all(|&count| count <= 2),
        is_closed: counts.values().all(|&count| count == 2),
        has_valid_triangles: has_valid_triangles(mesh),
        edge_count: counts.len(),
        boundary_edge_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Triangle;
    use nalgebra::Point3;

    fn tetrahedron() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        let d = mesh.add_vertex(Point3::new(0.0, 0.0, 1.0));
        mesh.add_triangle(Triangle::new([a, c, b]));
        mesh.add_triangle(Triangle::new([a, b, d]));
        mesh.add_triangle(Triangle::new([b, c, d]));
        mesh.add_triangle(Triangle::new([c, a, d]));
        mesh
    }

    #[test]
    fn test_tetrahedron_watertight() {
        let mesh = tetrahedron();
        let validation = validate_mesh(&mesh);
        assert!(validation.is_manifold);
        assert!(validation.is_closed);
        assert!(validation.has_valid_triangles);
        assert!(validation.is_ok());
        assert_eq!(validation.edge_count, 6);
        assert_eq!(validation.boundary_edge_count, 0);
    }

    #[test]
    fn test_open_fan_not_closed() {
        let mut mesh = tetrahedron();
        mesh.triangles.pop();
        let validation = validate_mesh(&mesh);
        assert!(validation.is_manifold);
        assert!(!validation.is_closed);
        assert_eq!(validation.boundary_edge_count, 3);
    }

    #[test]
    fn test_fin_not_manifold() {
        let mut mesh = tetrahedron();
        // Third triangle on an existing edge.
        let e = mesh.add_vertex(Point3::new(2.0, 2.0, 2.0));
        mesh.add_triangle(Triangle::new([0, 1, e]));
        assert!(!is_manifold(&mesh));
    }

    #[test]
    fn test_degenerate_triangle_detected() {
        let mut mesh = tetrahedron();
        mesh.add_triangle(Triangle::new([0, 0, 1]));
        assert!(!has_valid_triangles(&mesh));
    }
}
