// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! STL exporter
//!
//! Both encodings carry the same triangle list: 80-byte header, little
//! endian u32 facet count and 50 bytes per facet for binary; `solid` /
//! `facet normal` blocks for ASCII. Facet normals are recomputed from
//! the geometry rather than stored, so the two encodings can never drift
//! apart.

use crate::geometry::Mesh;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Name written into the `solid` line and the binary header.
const SOLID_NAME: &str = "keychain";

/// Output encoding for STL export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

impl StlFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StlFormat::Binary => "binary",
            StlFormat::Ascii => "ascii",
        }
    }
}

/// Serialize a mesh as STL in the requested encoding.
pub fn export_stl(mesh: &Mesh, format: StlFormat) -> Vec<u8> {
    match format {
        StlFormat::Ascii => export_ascii(mesh).into_bytes(),
        StlFormat::Binary => export_binary(mesh),
    }
}

fn export_ascii(mesh: &Mesh) -> String {
    let mut out = String::with_capacity(mesh.triangle_count() * 200 + 32);
    writeln!(out, "solid {SOLID_NAME}").unwrap();
    for (i, triangle) in mesh.triangles.iter().enumerate() {
        let n = mesh.face_normal(i);
        writeln!(out, "  facet normal {} {} {}", n.x as f32, n.y as f32, n.z as f32).unwrap();
        writeln!(out, "    outer loop").unwrap();
        for &idx in &triangle.indices {
            let p = mesh.positions[idx];
            writeln!(out, "      vertex {} {} {}", p.x as f32, p.y as f32, p.z as f32).unwrap();
        }
        writeln!(out, "    endloop").unwrap();
        writeln!(out, "  endfacet").unwrap();
    }
    writeln!(out, "endsolid {SOLID_NAME}").unwrap();
    out
}

fn export_binary(mesh: &Mesh) -> Vec<u8> {
    let count = mesh.triangle_count();
    let mut out = Vec::with_capacity(84 + count * 50);

    let mut header = [0u8; 80];
    let tag = format!("{SOLID_NAME} (keyforge)");
    header[..tag.len()].copy_from_slice(tag.as_bytes());
    out.extend_from_slice(&header);
    out.extend_from_slice(&(count as u32).to_le_bytes());

    for (i, triangle) in mesh.triangles.iter().enumerate() {
        let n = mesh.face_normal(i);
        for v in [n.x, n.y, n.z] {
            out.extend_from_slice(&(v as f32).to_le_bytes());
        }
        for &idx in &triangle.indices {
            let p = mesh.positions[idx];
            for v in [p.x, p.y, p.z] {
                out.extend_from_slice(&(v as f32).to_le_bytes());
            }
        }
        // Attribute byte count, unused.
        out.extend_from_slice(&0u16.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Triangle;
    use nalgebra::Point3;

    fn single_triangle() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(Triangle::new([a, b, c]));
        mesh
    }

    #[test]
    fn test_binary_layout() {
        let bytes = export_stl(&single_triangle(), StlFormat::Binary);
        assert_eq!(bytes.len(), 84 + 50);
        let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap());
        assert_eq!(count, 1);
        // Normal of the XY triangle is +Z.
        let nz = f32::from_le_bytes(bytes[84 + 8..84 + 12].try_into().unwrap());
        assert_eq!(nz, 1.0);
        // Attribute bytes are zero.
        assert_eq!(&bytes[132..134], &[0, 0]);
    }

    #[test]
    fn test_ascii_structure() {
        let bytes = export_stl(&single_triangle(), StlFormat::Ascii);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("solid keychain\n"));
        assert!(text.trim_end().ends_with("endsolid keychain"));
        assert_eq!(text.matches("facet normal").count(), 1);
        assert_eq!(text.matches("vertex").count(), 3);
        assert!(text.contains("vertex 0 0 0"));
        assert!(text.contains("vertex 1 0 0"));
    }

    #[test]
    fn test_both_encodings_same_triangle_count() {
        let mesh = single_triangle();
        let binary = export_stl(&mesh, StlFormat::Binary);
        let ascii = String::from_utf8(export_stl(&mesh, StlFormat::Ascii)).unwrap();
        let binary_count = u32::from_le_bytes(binary[80..84].try_into().unwrap()) as usize;
        assert_eq!(binary_count, ascii.matches("endfacet").count());
    }
}
