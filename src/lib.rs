// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Keyforge geometry kernel
//!
//! Turns an uploaded image into a 3D-printable keychain: the silhouette
//! is traced and simplified, optional text is embossed on top, a keyring
//! hole is punched through, and the result is exported as manifold STL.

pub mod cache;
pub mod cancel;
pub mod contour;
pub mod error;
pub mod geometry;
pub mod hole;
pub mod io;
pub mod params;
pub mod pipeline;
pub mod request;
pub mod solid;
pub mod text;
pub mod trace;

#[cfg(feature = "wasm")]
pub mod ffi;

pub use cache::ModelCache;
pub use cancel::CancelToken;
pub use error::GenerateError;
pub use geometry::{GeometryStats, Mesh};
pub use io::{export_stl, import_stl, StlFormat};
pub use params::{FontStyle, KeychainParams};
pub use pipeline::{generate, GeneratedModel};
pub use request::handle_generate;
