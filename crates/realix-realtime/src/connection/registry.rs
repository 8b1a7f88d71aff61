//! Identity → live connection registry.

use std::sync::Arc;

use tracing::debug;

use crate::store::ConcurrentStore;

use super::handle::ConnectionHandle;
use super::identity::Identity;

/// Maps each identity to the handle of its most recently accepted,
/// not-yet-terminated connection.
///
/// At most one entry exists per identity. [`attach`](Self::attach) is the
/// single point enforcing that; it never closes anything itself.
#[derive(Debug, Default)]
pub struct Registry {
    sessions: ConcurrentStore<Identity, Arc<ConnectionHandle>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `handle` the active connection for `identity`.
    ///
    /// Returns the handle it displaced, if any. Closing that handle is the
    /// caller's job.
    pub fn attach(
        &self,
        identity: Identity,
        handle: Arc<ConnectionHandle>,
    ) -> Option<Arc<ConnectionHandle>> {
        self.sessions.swap(identity, handle)
    }

    /// Removes the entry for `identity` only if it is still `handle`.
    ///
    /// Returns whether a removal happened. A superseded session calling this
    /// leaves its replacement untouched.
    pub fn detach(&self, identity: &Identity, handle: &Arc<ConnectionHandle>) -> bool {
        self.sessions
            .compare_and_remove(identity, |current| Arc::ptr_eq(current, handle))
    }

    /// The active handle for `identity`, if any.
    pub fn lookup(&self, identity: &Identity) -> Option<Arc<ConnectionHandle>> {
        self.sessions.get(identity)
    }

    /// Number of identities with a live session.
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Asks every registered connection to close. Returns how many were asked.
    ///
    /// Entries are left in place; each session detaches itself as it ends.
    pub fn close_all(&self) -> usize {
        let handles = self.sessions.values();
        for handle in &handles {
            handle.close();
        }
        debug!(count = handles.len(), "Requested close of all sessions");
        handles.len()
    }
}
