//! # realix-realtime
//!
//! Real-time engine for realix. Provides:
//!
//! - A concurrent key-value store exposing atomic test-and-insert, swap,
//!   and compare-and-remove primitives
//! - A collision-free allocator of random values from `[1, U]`
//! - An identity registry enforcing one live session per origin
//! - The per-connection session loop, generic over its transport
//! - Engine-level metrics

pub mod allocator;
pub mod connection;
pub mod message;
pub mod metrics;
pub mod server;
pub mod session;
pub mod store;

pub use allocator::UniqueAllocator;
pub use connection::registry::Registry;
pub use server::RealtimeEngine;
pub use session::Session;
pub use store::ConcurrentStore;
