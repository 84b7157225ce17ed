// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! I/O module - STL export and import

mod exporter;
mod importer;

pub use exporter::{export_stl, StlFormat};
pub use importer::import_stl;
