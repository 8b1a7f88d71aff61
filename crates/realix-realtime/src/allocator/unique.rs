//! The unique-value allocator.

use std::sync::Arc;

use tracing::{debug, error, trace};

use realix_core::error::AppError;
use realix_core::result::AppResult;

use crate::store::ConcurrentStore;

use super::source::{OsRandom, RandomSource};
use super::value::{UpperBound, Value};

/// Issues random values from `[1, U]`, each at most once per process.
///
/// Values are never released: the used set only grows. As it approaches
/// `U` the expected number of draws per allocation grows without bound,
/// and [`allocate`](Self::allocate) does not detect exhaustion. Use
/// [`try_allocate`](Self::try_allocate) where a bound on the work matters.
#[derive(Debug)]
pub struct UniqueAllocator {
    /// Draw range.
    bound: UpperBound,
    /// Canonical keys of every value handed out so far.
    used: ConcurrentStore<String, ()>,
    /// Byte source for draws.
    source: Arc<dyn RandomSource>,
}

impl UniqueAllocator {
    /// Creates an allocator drawing from the OS generator.
    pub fn new(bound: UpperBound) -> Self {
        Self::with_source(bound, Arc::new(OsRandom))
    }

    /// Creates an allocator drawing from `source`.
    pub fn with_source(bound: UpperBound, source: Arc<dyn RandomSource>) -> Self {
        debug!(upper_bound = %bound, "Allocator initialized");
        Self {
            bound,
            used: ConcurrentStore::new(),
            source,
        }
    }

    /// Returns a value no previous call has returned.
    ///
    /// Retries on collisions and on randomness failures until a draw
    /// succeeds; never returns an error.
    pub fn allocate(&self) -> Value {
        loop {
            if let Some(value) = self.attempt() {
                return value;
            }
        }
    }

    /// Like [`allocate`](Self::allocate) but gives up after `max_draws` attempts.
    pub fn try_allocate(&self, max_draws: usize) -> AppResult<Value> {
        for _ in 0..max_draws {
            if let Some(value) = self.attempt() {
                return Ok(value);
            }
        }
        Err(AppError::exhausted(format!(
            "no unused value in [1, {}] after {max_draws} draws ({} issued)",
            self.bound,
            self.issued()
        )))
    }

    /// Number of values issued so far.
    pub fn issued(&self) -> usize {
        self.used.len()
    }

    /// The configured draw range.
    pub fn upper_bound(&self) -> &UpperBound {
        &self.bound
    }

    /// One draw plus the atomic claim of its key.
    fn attempt(&self) -> Option<Value> {
        let value = match self.bound.draw(self.source.as_ref()) {
            Ok(value) => value,
            Err(e) => {
                error!(error = %e, "Random draw failed, retrying");
                return None;
            }
        };

        if self.used.test_and_insert(value.key(), ()) {
            Some(value)
        } else {
            trace!(value = %value, "Drew an issued value, retrying");
            None
        }
    }
}
