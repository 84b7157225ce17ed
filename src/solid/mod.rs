// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Solid construction from 2D profiles

mod builder;
mod extrude;

pub use builder::build_solid;
pub use extrude::{extrude_walls, triangulate_cap, VertexPool};
