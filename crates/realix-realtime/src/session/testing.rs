//! In-memory transport for driving sessions in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use realix_core::error::AppError;
use realix_core::result::AppResult;

use super::transport::{ReadFailure, SessionTransport};

/// Session side of a scripted connection.
pub(crate) struct ScriptedTransport {
    inbound: mpsc::UnboundedReceiver<Result<(), ReadFailure>>,
    outbound: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
    pub fail_pushes: bool,
    pub panic_on_read: bool,
}

/// Test side of a scripted connection.
pub(crate) struct ScriptedPeer {
    inbound: mpsc::UnboundedSender<Result<(), ReadFailure>>,
    pub outbound: mpsc::UnboundedReceiver<String>,
    closed: Arc<AtomicBool>,
}

pub(crate) fn scripted() -> (ScriptedTransport, ScriptedPeer) {
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let closed = Arc::new(AtomicBool::new(false));

    (
        ScriptedTransport {
            inbound: in_rx,
            outbound: out_tx,
            closed: Arc::clone(&closed),
            fail_pushes: false,
            panic_on_read: false,
        },
        ScriptedPeer {
            inbound: in_tx,
            outbound: out_rx,
            closed,
        },
    )
}

impl ScriptedPeer {
    pub fn send_unit(&self) {
        let _ = self.inbound.send(Ok(()));
    }

    pub fn close_with(&self, code: Option<u16>) {
        let _ = self.inbound.send(Err(ReadFailure::Closed(code)));
    }

    pub fn fail_read(&self, message: &str) {
        let _ = self.inbound.send(Err(ReadFailure::Error(message.to_string())));
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionTransport for ScriptedTransport {
    async fn next_inbound(&mut self) -> Result<(), ReadFailure> {
        let next = self
            .inbound
            .recv()
            .await
            .unwrap_or(Err(ReadFailure::Closed(None)));
        if self.panic_on_read {
            panic!("scripted transport failure");
        }
        next
    }

    async fn push(&mut self, payload: String) -> AppResult<()> {
        if self.fail_pushes {
            return Err(AppError::transport("peer stopped reading"));
        }
        self.outbound
            .send(payload)
            .map_err(|_| AppError::transport("peer dropped"))
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
