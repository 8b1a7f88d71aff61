//! # realix-core
//!
//! Core crate for realix. Contains configuration schemas and the unified
//! error system shared by the realtime engine and the HTTP surface.
//!
//! This crate has **no** internal dependencies on other realix crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
