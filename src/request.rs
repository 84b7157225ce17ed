// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Request boundary
//!
//! JSON in, JSON out, matching the storefront payload: parameters arrive
//! camelCase, the response carries `success`, `stlData` and `format`.
//! ASCII exports embed the STL text directly; binary exports are base64.
//! Errors map to an HTTP-style status plus a machine-readable kind.

use crate::cache::ModelCache;
use crate::cancel::CancelToken;
use crate::error::GenerateError;
use crate::geometry::GeometryStats;
use crate::io::StlFormat;
use crate::params::KeychainParams;
use crate::pipeline::{self, GeneratedModel};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Parsed generation request: parameters plus the requested encoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub params: KeychainParams,
    pub format: StlFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    /// ASCII STL text, or base64 of the binary encoding.
    pub stl_data: String,
    pub format: String,
    pub stats: GeometryStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub kind: String,
}

/// Status code plus serialized JSON body.
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Handle one generation request end to end.
///
/// `params_json` is the storefront's JSON parameter object. A cache may
/// be shared across calls; without one the pipeline runs every time.
pub fn handle_generate(
    image_bytes: &[u8],
    params_json: &str,
    cache: Option<&ModelCache>,
    cancel: &CancelToken,
) -> HttpReply {
    let request: GenerateRequest = match serde_json::from_str(params_json) {
        Ok(request) => request,
        Err(e) => {
            return error_reply(&GenerateError::UnsupportedFormat(format!(
                "bad request parameters: {e}"
            )))
        }
    };

    let result = match cache {
        Some(cache) => cache.get_or_generate(image_bytes, &request.params, request.format, cancel),
        None => pipeline::generate(image_bytes, &request.params, request.format, cancel),
    };
    match result {
        Ok(model) => success_reply(&model),
        Err(e) => error_reply(&e),
    }
}

fn success_reply(model: &GeneratedModel) -> HttpReply {
    let stl_data = match model.format {
        StlFormat::Ascii => String::from_utf8_lossy(&model.bytes).into_owned(),
        StlFormat::Binary => BASE64.encode(&model.bytes),
    };
    let response = GenerateResponse {
        success: true,
        stl_data,
        format: model.format.as_str().to_string(),
        stats: model.stats.clone(),
    };
    HttpReply {
        status: 200,
        body: serde_json::to_string(&response).unwrap_or_else(|_| "{}".into()),
    }
}

fn error_reply(error: &GenerateError) -> HttpReply {
    tracing::debug!(kind = error.kind(), %error, "request failed");
    let response = ErrorResponse {
        success: false,
        error: error.to_string(),
        kind: error.kind().to_string(),
    };
    HttpReply {
        status: error.status(),
        body: serde_json::to_string(&response).unwrap_or_else(|_| "{}".into()),
    }
}
