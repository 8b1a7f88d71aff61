//! Supervisory boundary for connection tasks.
//!
//! Each session runs in its own task. A panic there is caught at the join
//! point, logged with the connection's context, and goes no further.

use std::any::Any;
use std::future::Future;

use tracing::{debug, error, warn};

use realix_realtime::connection::{ConnectionId, Identity};

/// Runs `task` on its own Tokio task and waits for it.
///
/// Returns the task's output, or `None` if it panicked or was cancelled.
pub async fn supervise<F>(identity: &Identity, conn_id: ConnectionId, task: F) -> Option<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(output) => {
            debug!(host = %identity, conn_id = %conn_id, "Connection task finished");
            Some(output)
        }
        Err(e) if e.is_panic() => {
            error!(
                host = %identity,
                conn_id = %conn_id,
                panic = %panic_message(e.into_panic()),
                "recovered from panic in connection task"
            );
            None
        }
        Err(e) => {
            warn!(host = %identity, conn_id = %conn_id, error = %e, "Connection task cancelled");
            None
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
