// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! FFI bindings for WASM

#[cfg(feature = "wasm")]
pub mod wasm;
