// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Error kinds for the generation pipeline
//!
//! Every failure is terminal for the current request: inputs are
//! deterministic, so retrying unchanged input reproduces the same failure.

use thiserror::Error;

/// All the ways a generation request can fail.
///
/// Each variant carries a human-readable message; [`GenerateError::kind`]
/// yields the machine-readable kind string surfaced at the request boundary.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    /// No foreground pixels were found above the binarization threshold.
    #[error("empty image: {0}")]
    EmptyImage(String),

    /// The uploaded bytes could not be decoded as an image, or the request
    /// parameters could not be understood.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The requested hole (plus wall clearance) does not fit inside the
    /// base shape, or it collides with text geometry.
    #[error("hole out of bounds: {0}")]
    HoleOutOfBounds(String),

    /// The built solid failed the manifold check (an edge not shared by
    /// exactly two triangles).
    #[error("non-manifold result: {0}")]
    NonManifoldResult(String),

    /// The built solid has no volume, or an intermediate stage collapsed
    /// to empty geometry.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The request was cancelled between pipeline stages.
    #[error("cancelled before stage '{0}'")]
    Cancelled(&'static str),
}

impl GenerateError {
    /// Machine-readable kind, as exposed in the error response JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyImage(_) => "EmptyImageError",
            Self::UnsupportedFormat(_) => "UnsupportedFormatError",
            Self::HoleOutOfBounds(_) => "HoleOutOfBoundsError",
            Self::NonManifoldResult(_) => "NonManifoldResultError",
            Self::DegenerateGeometry(_) => "DegenerateGeometryError",
            Self::Cancelled(_) => "CancelledError",
        }
    }

    /// HTTP status the request boundary maps this error to.
    ///
    /// Client-fixable failures are 400s, pipeline failures are 500s, and a
    /// client disconnect is reported with the de-facto 499 code.
    pub fn status(&self) -> u16 {
        match self {
            Self::EmptyImage(_) | Self::UnsupportedFormat(_) | Self::HoleOutOfBounds(_) => 400,
            Self::NonManifoldResult(_) | Self::DegenerateGeometry(_) => 500,
            Self::Cancelled(_) => 499,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings_match_api_contract() {
        let cases: Vec<(GenerateError, &str)> = vec![
            (GenerateError::EmptyImage("x".into()), "EmptyImageError"),
            (
                GenerateError::UnsupportedFormat("x".into()),
                "UnsupportedFormatError",
            ),
            (
                GenerateError::HoleOutOfBounds("x".into()),
                "HoleOutOfBoundsError",
            ),
            (
                GenerateError::NonManifoldResult("x".into()),
                "NonManifoldResultError",
            ),
            (
                GenerateError::DegenerateGeometry("x".into()),
                "DegenerateGeometryError",
            ),
            (GenerateError::Cancelled("trace"), "CancelledError"),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind);
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(GenerateError::HoleOutOfBounds("x".into()).status(), 400);
        assert_eq!(GenerateError::NonManifoldResult("x".into()).status(), 500);
        assert_eq!(GenerateError::Cancelled("build").status(), 499);
    }
}
