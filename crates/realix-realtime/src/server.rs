//! Top-level real-time engine that ties the allocator, registry, and
//! session loop together.

use std::sync::Arc;

use tracing::info;

use realix_core::config::allocator::AllocatorConfig;
use realix_core::config::realtime::RealtimeConfig;
use realix_core::result::AppResult;

use crate::allocator::{UniqueAllocator, UpperBound};
use crate::connection::handle::ConnectionHandle;
use crate::connection::identity::Identity;
use crate::connection::registry::Registry;
use crate::metrics::RealtimeMetrics;
use crate::session::{Session, SessionTransport};

/// Central real-time engine shared by every connection task.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Unique-value allocator.
    pub allocator: Arc<UniqueAllocator>,
    /// Identity → live connection registry.
    pub registry: Arc<Registry>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    /// Configuration.
    config: RealtimeConfig,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates an engine from configuration, validating the upper bound.
    pub fn new(allocator: &AllocatorConfig, config: RealtimeConfig) -> AppResult<Self> {
        let bound: UpperBound = allocator.upper_bound.parse()?;
        Ok(Self::with_allocator(UniqueAllocator::new(bound), config))
    }

    /// Creates an engine around an existing allocator.
    pub fn with_allocator(allocator: UniqueAllocator, config: RealtimeConfig) -> Self {
        info!(
            upper_bound = %allocator.upper_bound(),
            "Real-time engine initialized"
        );

        Self {
            allocator: Arc::new(allocator),
            registry: Arc::new(Registry::new()),
            metrics: Arc::new(RealtimeMetrics::new()),
            config,
        }
    }

    /// Accept path: registers a new connection for `identity` and returns its
    /// session, ready to run.
    ///
    /// Any session previously registered for the identity is closed here,
    /// after the swap, so at most one stays live.
    pub fn open_session<T: SessionTransport>(&self, identity: Identity, transport: T) -> Session<T> {
        let handle = Arc::new(ConnectionHandle::new(identity.clone()));

        info!(host = %identity, conn_id = %handle.id, "new connection");

        if let Some(previous) = self.registry.attach(identity.clone(), Arc::clone(&handle)) {
            previous.close();
            self.metrics.connection_replaced();
            info!(
                host = %identity,
                old_conn_id = %previous.id,
                conn_id = %handle.id,
                "connection renewed"
            );
        }

        self.metrics.connection_opened();

        Session::new(
            handle,
            Arc::clone(&self.registry),
            Arc::clone(&self.allocator),
            Arc::clone(&self.metrics),
            transport,
        )
    }

    /// Called once the accept loop has stopped.
    ///
    /// Live sessions keep running unless `close_sessions_on_shutdown` is set.
    pub fn shutdown(&self) {
        if self.config.close_sessions_on_shutdown {
            let count = self.registry.close_all();
            info!(count, "Closed live sessions on shutdown");
        } else {
            info!(
                active = self.registry.active_count(),
                "Accept loop stopped, live sessions left running"
            );
        }
    }
}
