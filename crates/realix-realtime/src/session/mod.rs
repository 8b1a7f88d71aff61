//! Per-connection session loop.
//!
//! A session moves `Open → Receiving → Closed`. While receiving it waits for
//! the next inbound unit, allocates a value, and pushes it back before
//! waiting again. It ends when its own read fails or when its connection
//! handle is closed by whoever replaced it. Nothing else cancels it.

pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use realix_core::result::AppResult;

use crate::allocator::UniqueAllocator;
use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::connection::registry::Registry;
use crate::message::RandomNumberMessage;
use crate::metrics::RealtimeMetrics;

pub use transport::{ReadFailure, SessionTransport};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Attached, loop not started.
    Open,
    /// Waiting for the next inbound unit.
    Receiving,
    /// Terminal.
    Closed,
}

/// Why a session left `Receiving`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The connection handle was closed, by a replacing session or at shutdown.
    CloseRequested,
    /// The transport read failed.
    ReadFailed(ReadFailure),
}

/// Summary returned when a session finishes.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Connection the session served.
    pub connection_id: ConnectionId,
    /// Values pushed successfully.
    pub pushed: u64,
    /// Pushes that failed.
    pub push_failures: u64,
    /// Why the loop stopped.
    pub end: SessionEnd,
    /// Whether this session removed its own registry entry.
    pub detached: bool,
}

/// One accepted connection from attachment to teardown.
///
/// The registry entry is released when the session finishes running, or
/// when it is dropped without ever being run.
#[derive(Debug)]
pub struct Session<T> {
    handle: Arc<ConnectionHandle>,
    allocator: Arc<UniqueAllocator>,
    metrics: Arc<RealtimeMetrics>,
    transport: T,
    state: SessionState,
    teardown: Teardown,
}

impl<T: SessionTransport> Session<T> {
    /// Wraps an already attached connection.
    pub(crate) fn new(
        handle: Arc<ConnectionHandle>,
        registry: Arc<Registry>,
        allocator: Arc<UniqueAllocator>,
        metrics: Arc<RealtimeMetrics>,
        transport: T,
    ) -> Self {
        let teardown = Teardown {
            registry,
            handle: Arc::clone(&handle),
            metrics: Arc::clone(&metrics),
            armed: true,
        };

        Self {
            handle,
            allocator,
            metrics,
            transport,
            state: SessionState::Open,
            teardown,
        }
    }

    /// The handle registered for this session.
    pub fn handle(&self) -> &Arc<ConnectionHandle> {
        &self.handle
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs the receive loop to completion and tears the session down.
    ///
    /// Teardown detaches the registry entry only if it still points at this
    /// session, then closes the transport. If the loop panics, the guarded
    /// detach still runs while the task unwinds.
    pub async fn run(mut self) -> SessionReport {
        self.state = SessionState::Receiving;
        debug!(conn_id = %self.handle.id, host = %self.handle.identity, "Session receiving");

        let mut pushed = 0u64;
        let mut push_failures = 0u64;

        let end = loop {
            let read = tokio::select! {
                biased;
                _ = self.handle.closed() => break SessionEnd::CloseRequested,
                read = self.transport.next_inbound() => read,
            };

            if let Err(failure) = read {
                if failure.is_expected() {
                    debug!(conn_id = %self.handle.id, reason = %failure, "Connection closed by peer");
                } else {
                    self.metrics.read_error();
                    warn!(conn_id = %self.handle.id, error = %failure, "Reading message failed");
                }
                break SessionEnd::ReadFailed(failure);
            }

            self.metrics.message_received();

            match self.push_value().await {
                Ok(()) => {
                    pushed += 1;
                    self.metrics.value_pushed();
                }
                Err(e) => {
                    push_failures += 1;
                    self.metrics.push_failed();
                    warn!(conn_id = %self.handle.id, error = %e, "Failed to push value");
                }
            }
        };

        self.state = SessionState::Closed;
        let detached = self.teardown.complete();
        self.transport.close().await;
        self.handle.close();

        debug!(
            conn_id = %self.handle.id,
            pushed,
            push_failures,
            detached,
            "Session closed"
        );

        SessionReport {
            connection_id: self.handle.id,
            pushed,
            push_failures,
            end,
            detached,
        }
    }

    async fn push_value(&mut self) -> AppResult<()> {
        let value = self.allocator.allocate();
        trace!(conn_id = %self.handle.id, value = %value, "Allocated value");
        let payload = RandomNumberMessage::new(value).to_json()?;
        self.transport.push(payload).await
    }
}

/// Removes the registry entry when a session ends, however it ends.
#[derive(Debug)]
struct Teardown {
    registry: Arc<Registry>,
    handle: Arc<ConnectionHandle>,
    metrics: Arc<RealtimeMetrics>,
    armed: bool,
}

impl Teardown {
    /// Normal-path teardown. Returns whether the entry was removed.
    fn complete(&mut self) -> bool {
        self.armed = false;
        self.detach()
    }

    fn detach(&self) -> bool {
        let removed = self.registry.detach(&self.handle.identity, &self.handle);
        if removed {
            info!(host = %self.handle.identity, conn_id = %self.handle.id, "connection deleted");
        }
        self.metrics.connection_closed();
        removed
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        if self.armed {
            warn!(conn_id = %self.handle.id, "Session aborted, cleaning up");
            self.detach();
            self.handle.close();
        }
    }
}
