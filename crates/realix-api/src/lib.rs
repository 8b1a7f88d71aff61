//! # realix-api
//!
//! HTTP layer for realix: the `/ws` upgrade endpoint that feeds the
//! real-time engine, a health endpoint, and the server run loop.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod router;
pub mod state;
pub mod supervisor;
pub mod transport;

pub use app::{run_server, serve};
pub use state::AppState;
