// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Result cache
//!
//! Identical requests (same image bytes, parameters and format) share
//! one computation and one cached result. Each key owns a `OnceLock`
//! cell, so concurrent requests for the same key block on the first
//! computation instead of racing it. Cancelled results are evicted,
//! since cancellation describes the caller, not the request; a waiter
//! whose own token is still live retries once.

use crate::cancel::CancelToken;
use crate::error::GenerateError;
use crate::io::StlFormat;
use crate::params::KeychainParams;
use crate::pipeline::{self, GeneratedModel};
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::{Arc, OnceLock};

type Slot = Arc<OnceLock<Result<GeneratedModel, GenerateError>>>;

#[derive(Default)]
pub struct ModelCache {
    entries: DashMap<[u8; 32], Slot>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key over everything that influences the output bytes.
    pub fn key(image_bytes: &[u8], params: &KeychainParams, format: StlFormat) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(image_bytes);
        hasher.update(params.normalized().cache_bytes());
        hasher.update([format as u8]);
        hasher.finalize().into()
    }

    /// Return the cached model for this request, computing it at most
    /// once across threads.
    pub fn get_or_generate(
        &self,
        image_bytes: &[u8],
        params: &KeychainParams,
        format: StlFormat,
        cancel: &CancelToken,
    ) -> Result<GeneratedModel, GenerateError> {
        let key = Self::key(image_bytes, params, format);
        let (result, fresh) = self.run_slot(key, image_bytes, params, format, cancel);

        // A cancelled computation must not poison the cache for the next
        // caller of the same request.
        if matches!(result, Err(GenerateError::Cancelled(_))) {
            self.entries.remove(&key);
            // A waiter that inherited another request's cancellation gets
            // one retry under its own token.
            if !fresh && !cancel.is_cancelled() {
                tracing::debug!("first computation cancelled, retrying");
                let (retry, _) = self.run_slot(key, image_bytes, params, format, cancel);
                if matches!(retry, Err(GenerateError::Cancelled(_))) {
                    self.entries.remove(&key);
                }
                return retry;
            }
        }
        result
    }

    fn run_slot(
        &self,
        key: [u8; 32],
        image_bytes: &[u8],
        params: &KeychainParams,
        format: StlFormat,
        cancel: &CancelToken,
    ) -> (Result<GeneratedModel, GenerateError>, bool) {
        let slot: Slot = self
            .entries
            .entry(key)
            .or_insert_with(|| Arc::new(OnceLock::new()))
            .clone();

        let mut fresh = false;
        let result = slot.get_or_init(|| {
            fresh = true;
            pipeline::generate(image_bytes, params, format, cancel)
        });
        if !fresh {
            tracing::debug!("cache hit");
        }
        (result.clone(), fresh)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};

    fn png() -> Vec<u8> {
        let mut img = GrayImage::from_pixel(60, 60, Luma([255u8]));
        for y in 10..50 {
            for x in 10..50 {
                img.put_pixel(x, y, Luma([0u8]));
            }
        }
        let mut bytes = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_same_request_same_key() {
        let image = png();
        let params = KeychainParams::default();
        let a = ModelCache::key(&image, &params, StlFormat::Binary);
        let b = ModelCache::key(&image, &params, StlFormat::Binary);
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_changes_key() {
        let image = png();
        let params = KeychainParams::default();
        assert_ne!(
            ModelCache::key(&image, &params, StlFormat::Binary),
            ModelCache::key(&image, &params, StlFormat::Ascii)
        );
    }

    #[test]
    fn test_second_call_hits_cache() {
        let cache = ModelCache::new();
        let image = png();
        let params = KeychainParams::default();
        let token = CancelToken::new();
        let first = cache
            .get_or_generate(&image, &params, StlFormat::Binary, &token)
            .unwrap();
        assert_eq!(cache.len(), 1);
        let second = cache
            .get_or_generate(&image, &params, StlFormat::Binary, &token)
            .unwrap();
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cancelled_result_not_cached() {
        let cache = ModelCache::new();
        let image = png();
        let params = KeychainParams::default();
        let cancelled = CancelToken::new();
        cancelled.cancel();
        let err = cache
            .get_or_generate(&image, &params, StlFormat::Binary, &cancelled)
            .unwrap_err();
        assert_eq!(err.kind(), "CancelledError");
        assert!(cache.is_empty());

        // The same request succeeds afterwards.
        let token = CancelToken::new();
        cache
            .get_or_generate(&image, &params, StlFormat::Binary, &token)
            .unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_waiter_outlives_cancelled_computation() {
        let cache = ModelCache::new();
        let image = png();
        let params = KeychainParams::default();
        let key = ModelCache::key(&image, &params, StlFormat::Binary);

        // Another caller's computation already landed in the slot as
        // cancelled; a waiter with a live token must not inherit it.
        let slot: Slot = Arc::new(OnceLock::new());
        slot.set(Err(GenerateError::Cancelled("build"))).unwrap();
        cache.entries.insert(key, slot);

        let token = CancelToken::new();
        let model = cache
            .get_or_generate(&image, &params, StlFormat::Binary, &token)
            .unwrap();
        assert!(!model.bytes.is_empty());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_result_cached() {
        let cache = ModelCache::new();
        let params = KeychainParams::default();
        let token = CancelToken::new();
        let err = cache
            .get_or_generate(b"not an image", &params, StlFormat::Binary, &token)
            .unwrap_err();
        assert_eq!(err.kind(), "UnsupportedFormatError");
        // Deterministic failures are worth caching too.
        assert_eq!(cache.len(), 1);
    }
}
