// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Indexed triangle mesh

use super::BoundingBox;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Triangle defined by three vertex indices, counter-clockwise when seen
/// from outside the solid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }
}

/// Indexed triangle mesh. Vertices are shared between triangles, so edge
/// connectivity can be checked by index alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Point3<f64>>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        let index = self.positions.len();
        self.positions.push(position);
        index
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.positions)
    }

    /// Outward unit normal of one triangle, or +Z for a degenerate one.
    pub fn face_normal(&self, index: usize) -> Vector3<f64> {
        let [i0, i1, i2] = self.triangles[index].indices;
        let v0 = self.positions[i0];
        let v1 = self.positions[i1];
        let v2 = self.positions[i2];
        let n = (v1 - v0).cross(&(v2 - v0));
        let len = n.norm();
        if len > 1e-12 {
            n / len
        } else {
            Vector3::z()
        }
    }

    /// Drop triangles that reference the same vertex twice.
    pub fn remove_degenerate_triangles(&mut self) -> usize {
        let before = self.triangles.len();
        self.triangles.retain(|t| {
            let [a, b, c] = t.indices;
            a != b && b != c && a != c
        });
        before - self.triangles.len()
    }
}
