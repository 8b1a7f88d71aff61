//! Convenience result type alias for realix.

use crate::error::AppError;

/// A specialized `Result` type for realix operations.
pub type AppResult<T> = Result<T, AppError>;
