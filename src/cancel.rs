// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Keyforge Inc.

//! Cooperative cancellation
//!
//! The generation pipeline polls a shared flag between stages; it never
//! interrupts a stage mid-flight. Good enough for request abandonment,
//! where the point is to stop burning CPU on an answer nobody wants.

use crate::error::GenerateError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag shared between the caller and the
/// pipeline.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Bail out of the pipeline if cancellation was requested. `stage`
    /// names the work that would have run next.
    pub fn check(&self, stage: &'static str) -> Result<(), GenerateError> {
        if self.is_cancelled() {
            tracing::debug!(stage, "generation cancelled");
            Err(GenerateError::Cancelled(stage))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_passes() {
        let token = CancelToken::new();
        assert!(token.check("trace").is_ok());
    }

    #[test]
    fn test_cancel_propagates_to_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        token.cancel();
        assert!(other.is_cancelled());
        let err = other.check("simplify").unwrap_err();
        assert_eq!(err.kind(), "CancelledError");
    }
}
