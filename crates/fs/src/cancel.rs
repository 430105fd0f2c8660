//! Cooperative cancellation for walks.
//!
//! The walker checks the token right before a record is handed to the
//! accept hook and before each directory is listed. Tokens are cheap to clone and every clone observes the
//! same flag, so a signal handler or another thread can stop a running walk.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::error::{Result, WalkError};

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token for walks that are never interrupted. Nothing else holds
    /// its flag, so only an explicit [`cancel`](Self::cancel) can trigger it.
    pub fn never() -> Self {
        Self::new()
    }

    /// Wraps an existing flag, e.g. one registered with a signal handler.
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    /// The shared flag backing this token.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Returns `Err(WalkError::Cancelled)` once the token has been triggered.
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(WalkError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
