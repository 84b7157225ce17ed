// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Request parameters and validation policy
//!
//! Field names and defaults mirror the JSON payload sent by the storefront
//! customization panel. Out-of-range numbers are clamped to the slider
//! ranges; non-finite numbers fall back to the defaults.

use serde::{Deserialize, Serialize};

/// Allowed range for the base plate thickness, in mm.
pub const BASE_THICKNESS_RANGE: (f64, f64) = (1.0, 10.0);
/// Allowed range for the embossed text height, in mm.
pub const TEXT_HEIGHT_RANGE: (f64, f64) = (0.5, 5.0);
/// Hole position is a percentage of the base bounding box.
pub const HOLE_PERCENT_RANGE: (f64, f64) = (0.0, 100.0);

/// Font family requested by the UI. Closed set; unknown strings are
/// rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Arial,
    Helvetica,
    Times,
    Courier,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self::Arial
    }
}

impl FontStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arial => "arial",
            Self::Helvetica => "helvetica",
            Self::Times => "times",
            Self::Courier => "courier",
        }
    }
}

/// One generation request's parameter set. Immutable once normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeychainParams {
    /// Base plate thickness in mm (1-10).
    pub base_thickness: f64,
    /// Height of embossed text above the base, in mm (0.5-5).
    pub text_height: f64,
    /// Text to emboss; empty string means no text.
    pub text: String,
    pub font_style: FontStyle,
    pub has_hole: bool,
    /// Hole center X as a percentage of the base bounding box (0-100).
    pub hole_x: f64,
    /// Hole center Y as a percentage of the base bounding box (0-100).
    pub hole_y: f64,
}

impl Default for KeychainParams {
    fn default() -> Self {
        Self {
            base_thickness: 5.0,
            text_height: 2.0,
            text: String::new(),
            font_style: FontStyle::default(),
            has_hole: true,
            hole_x: 50.0,
            hole_y: 50.0,
        }
    }
}

impl KeychainParams {
    /// Clamp all numeric fields into their documented ranges.
    ///
    /// Returns a normalized copy; the original request stays untouched so
    /// the boundary can log what the client actually sent.
    pub fn normalized(&self) -> Self {
        let defaults = Self::default();
        let mut out = self.clone();
        out.base_thickness = clamp_or(
            self.base_thickness,
            BASE_THICKNESS_RANGE,
            defaults.base_thickness,
        );
        out.text_height = clamp_or(self.text_height, TEXT_HEIGHT_RANGE, defaults.text_height);
        out.hole_x = clamp_or(self.hole_x, HOLE_PERCENT_RANGE, defaults.hole_x);
        out.hole_y = clamp_or(self.hole_y, HOLE_PERCENT_RANGE, defaults.hole_y);
        if out != *self {
            tracing::debug!(?self, ?out, "clamped out-of-range parameters");
        }
        out
    }

    /// Stable byte encoding used for cache keys.
    ///
    /// Field order is fixed; floats are encoded by bit pattern, so two
    /// requests hash equal exactly when they generate the same model.
    pub fn cache_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(64 + self.text.len());
        bytes.extend_from_slice(&self.base_thickness.to_bits().to_le_bytes());
        bytes.extend_from_slice(&self.text_height.to_bits().to_le_bytes());
        bytes.extend_from_slice(&(self.text.len() as u64).to_le_bytes());
        bytes.extend_from_slice(self.text.as_bytes());
        bytes.push(self.font_style as u8);
        bytes.push(self.has_hole as u8);
        bytes.extend_from_slice(&self.hole_x.to_bits().to_le_bytes());
        bytes.extend_from_slice(&self.hole_y.to_bits().to_le_bytes());
        bytes
    }
}

fn clamp_or(value: f64, range: (f64, f64), fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(range.0, range.1)
    } else {
        fallback
    }
}
