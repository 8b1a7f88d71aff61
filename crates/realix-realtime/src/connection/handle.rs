//! Handle to a single live connection.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::identity::Identity;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// Non-owning reference to a live connection, sufficient to close it.
///
/// The session loop owns the transport itself; anyone holding the handle
/// can ask it to close, which ends the loop's pending read. Handles are
/// compared by `Arc` pointer identity, never structurally.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// Identity the connection was accepted under.
    pub identity: Identity,
    /// When the connection was accepted.
    pub connected_at: DateTime<Utc>,
    /// Fired once when the connection must close.
    closer: CancellationToken,
}

impl ConnectionHandle {
    /// Creates a handle for a freshly accepted connection.
    pub fn new(identity: Identity) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            connected_at: Utc::now(),
            closer: CancellationToken::new(),
        }
    }

    /// Requests the connection to close. Idempotent.
    pub fn close(&self) {
        self.closer.cancel();
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closer.is_cancelled()
    }

    /// Resolves once the connection has been asked to close.
    pub async fn closed(&self) {
        self.closer.cancelled().await;
    }
}
