// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Geometry module - mesh representation and validation

pub mod analytics;
mod bbox;
mod mesh;
pub mod validate;

pub use analytics::GeometryStats;
pub use bbox::BoundingBox;
pub use mesh::{Mesh, Triangle};
