// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! STL importer
//!
//! Reads back both encodings, mainly for roundtrip verification. The
//! encoding is sniffed from the byte layout, not the `solid` prefix,
//! because binary exporters are allowed to start their header with
//! anything. Vertices are deduplicated by f32 bit pattern so edge
//! connectivity checks work on the reimported mesh.

use crate::error::GenerateError;
use crate::geometry::{Mesh, Triangle};
use nalgebra::Point3;
use std::collections::HashMap;

/// Parse STL bytes in either encoding.
pub fn import_stl(bytes: &[u8]) -> Result<Mesh, GenerateError> {
    if looks_binary(bytes) {
        import_binary(bytes)
    } else {
        let text = std::str::from_utf8(bytes).map_err(|_| {
            GenerateError::UnsupportedFormat("STL is neither valid binary nor UTF-8 text".into())
        })?;
        import_ascii(text)
    }
}

/// Binary iff the facet count at offset 80 matches the byte length
/// exactly.
fn looks_binary(bytes: &[u8]) -> bool {
    if bytes.len() < 84 {
        return false;
    }
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    84 + count * 50 == bytes.len()
}

/// Accumulates triangles, merging vertices with identical f32 coords.
struct MeshAccumulator {
    mesh: Mesh,
    seen: HashMap<[u32; 3], usize>,
}

impl MeshAccumulator {
    fn new() -> Self {
        Self {
            mesh: Mesh::new(),
            seen: HashMap::new(),
        }
    }

    fn vertex(&mut self, x: f32, y: f32, z: f32) -> usize {
        let key = [x.to_bits(), y.to_bits(), z.to_bits()];
        *self.seen.entry(key).or_insert_with(|| {
            self.mesh
                .add_vertex(Point3::new(x as f64, y as f64, z as f64))
        })
    }

    fn triangle(&mut self, v: [usize; 3]) {
        self.mesh.add_triangle(Triangle::new(v));
    }
}

fn import_binary(bytes: &[u8]) -> Result<Mesh, GenerateError> {
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    let mut acc = MeshAccumulator::new();

    let f32_at = |offset: usize| {
        f32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    };
    for i in 0..count {
        let base = 84 + i * 50;
        // Normal at `base` is ignored; it is derivable from the vertices.
        let mut indices = [0usize; 3];
        for (j, slot) in indices.iter_mut().enumerate() {
            let v = base + 12 + j * 12;
            *slot = acc.vertex(f32_at(v), f32_at(v + 4), f32_at(v + 8));
        }
        acc.triangle(indices);
    }
    Ok(acc.mesh)
}

fn import_ascii(text: &str) -> Result<Mesh, GenerateError> {
    if !text.trim_start().starts_with("solid") {
        return Err(GenerateError::UnsupportedFormat(
            "ASCII STL must start with 'solid'".into(),
        ));
    }
    let mut acc = MeshAccumulator::new();
    let mut pending: Vec<usize> = Vec::with_capacity(3);

    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }
        let mut coord = [0f32; 3];
        for slot in &mut coord {
            let token = tokens.next().ok_or_else(|| {
                GenerateError::UnsupportedFormat(format!(
                    "truncated vertex on line {}",
                    line_no + 1
                ))
            })?;
            *slot = token.parse().map_err(|_| {
                GenerateError::UnsupportedFormat(format!(
                    "bad coordinate {:?} on line {}",
                    token,
                    line_no + 1
                ))
            })?;
        }
        pending.push(acc.vertex(coord[0], coord[1], coord[2]));
        if pending.len() == 3 {
            acc.triangle([pending[0], pending[1], pending[2]]);
            pending.clear();
        }
    }
    if !pending.is_empty() {
        return Err(GenerateError::UnsupportedFormat(
            "vertex count not a multiple of three".into(),
        ));
    }
    Ok(acc.mesh)
}
