//! Connection identity, handles, and the one-session-per-identity registry.

pub mod handle;
pub mod identity;
pub mod registry;

pub use handle::{ConnectionHandle, ConnectionId};
pub use identity::Identity;
pub use registry::Registry;
