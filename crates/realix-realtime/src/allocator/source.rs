//! Sources of random bytes for the allocator.

use rand::TryRngCore;
use rand::rngs::OsRng;

use realix_core::error::{AppError, ErrorKind};
use realix_core::result::AppResult;

/// A fallible source of uniformly random bytes.
///
/// Failures are treated as transient: the allocator logs them and draws again.
pub trait RandomSource: Send + Sync + std::fmt::Debug {
    /// Fills `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> AppResult<()>;
}

/// The operating system's generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> AppResult<()> {
        OsRng.try_fill_bytes(buf).map_err(|e| {
            AppError::with_source(
                ErrorKind::Randomness,
                format!("OS random source failed: {e}"),
                e,
            )
        })
    }
}
