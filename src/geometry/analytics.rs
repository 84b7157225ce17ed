// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Geometry analytics and statistics
//!
//! Summary numbers reported alongside the exported model so the client
//! can show dimensions and print-volume estimates without parsing STL.

use super::{validate, Mesh};
use serde::{Deserialize, Serialize};

/// Geometry statistics for a generated solid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryStats {
    /// Enclosed volume in mm^3.
    pub volume: f64,
    /// Total surface area in mm^2.
    pub surface_area: f64,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z] in mm.
    pub bbox: [f64; 6],
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Every edge shared by exactly two triangles.
    pub is_watertight: bool,
}

impl GeometryStats {
    pub fn empty() -> Self {
        Self {
            volume: 0.0,
            surface_area: 0.0,
            bbox: [0.0; 6],
            vertex_count: 0,
            triangle_count: 0,
            is_watertight: false,
        }
    }
}

/// Analyze mesh geometry and compute statistics.
pub fn analyze(mesh: &Mesh) -> GeometryStats {
    if mesh.positions.is_empty() || mesh.triangles.is_empty() {
        return GeometryStats::empty();
    }

    let bb = mesh.bounding_box();
    GeometryStats {
        volume: volume(mesh),
        surface_area: surface_area(mesh),
        bbox: [bb.min.x, bb.min.y, bb.min.z, bb.max.x, bb.max.y, bb.max.z],
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        is_watertight: validate::is_closed(mesh),
    }
}

/// Enclosed volume via the divergence theorem: sum of signed tetrahedron
/// volumes against the origin. Exact for closed meshes with consistent
/// outward winding.
pub fn volume(mesh: &Mesh) -> f64 {
    let mut total = 0.0;
    for triangle in &mesh.triangles {
        let v0 = mesh.positions[triangle.indices[0]];
        let v1 = mesh.positions[triangle.indices[1]];
        let v2 = mesh.positions[triangle.indices[2]];
        total += v0.coords.dot(&v1.coords.cross(&v2.coords)) / 6.0;
    }
    total
}

pub fn surface_area(mesh: &Mesh) -> f64 {
    let mut area = 0.0;
    for triangle in &mesh.triangles {
        let v0 = mesh.positions[triangle.indices[0]];
        let v1 = mesh.positions[triangle.indices[1]];
        let v2 = mesh.positions[triangle.indices[2]];
        area += (v1 - v0).cross(&(v2 - v0)).norm() / 2.0;
    }
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Triangle;
    use nalgebra::Point3;

    /// Axis-aligned unit cube with outward winding.
    fn unit_cube() -> Mesh {
        let mut mesh = Mesh::new();
        for z in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for x in [0.0, 1.0] {
                    mesh.add_vertex(Point3::new(x, y, z));
                }
            }
        }
        let quads: [[usize; 4]; 6] = [
            [0, 2, 3, 1], // bottom, seen from below
            [4, 5, 7, 6], // top
            [0, 1, 5, 4], // front (y = 0)
            [2, 6, 7, 3], // back
            [0, 4, 6, 2], // left
            [1, 3, 7, 5], // right
        ];
        for [a, b, c, d] in quads {
            mesh.add_triangle(Triangle::new([a, b, c]));
            mesh.add_triangle(Triangle::new([a, c, d]));
        }
        mesh
    }

    #[test]
    fn test_cube_volume_and_area() {
        let mesh = unit_cube();
        let stats = analyze(&mesh);
        assert!((stats.volume - 1.0).abs() < 1e-12, "volume {}", stats.volume);
        assert!(
            (stats.surface_area - 6.0).abs() < 1e-12,
            "area {}",
            stats.surface_area
        );
        assert!(stats.is_watertight);
        assert_eq!(stats.vertex_count, 8);
        assert_eq!(stats.triangle_count, 12);
    }

    #[test]
    fn test_inverted_cube_negative_volume() {
        let mut mesh = unit_cube();
        for triangle in &mut mesh.triangles {
            triangle.indices.swap(1, 2);
        }
        assert!(volume(&mesh) < 0.0);
    }

    #[test]
    fn test_empty_mesh_stats() {
        let stats = analyze(&Mesh::new());
        assert_eq!(stats.volume, 0.0);
        assert!(!stats.is_watertight);
    }
}
