// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! WASM bindings using wasm-bindgen
//!
//! Browser-facing surface for the storefront viewport: image bytes plus
//! the JSON parameter object in, the usual response JSON out.

use crate::cancel::CancelToken;
use crate::request;
use wasm_bindgen::prelude::*;

/// Run the generation pipeline and return the response JSON. The HTTP
/// status that a server would send is folded into the `success` flag and
/// error `kind` inside the body.
#[wasm_bindgen]
pub fn generate_keychain(image_bytes: &[u8], params_json: &str) -> String {
    let reply = request::handle_generate(image_bytes, params_json, None, &CancelToken::new());
    reply.body
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
