//! Axum WebSocket adapter for the session loop.

use std::io;

use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tracing::trace;

use realix_core::error::{AppError, ErrorKind};
use realix_core::result::AppResult;
use realix_realtime::session::transport::CLOSE_ABNORMAL;
use realix_realtime::session::{ReadFailure, SessionTransport};

/// A session transport over an upgraded axum WebSocket.
pub struct WsTransport {
    socket: WebSocket,
}

impl WsTransport {
    /// Wraps an upgraded socket.
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

#[async_trait]
impl SessionTransport for WsTransport {
    async fn next_inbound(&mut self) -> Result<(), ReadFailure> {
        loop {
            match self.socket.recv().await {
                Some(Ok(Message::Text(_) | Message::Binary(_))) => return Ok(()),
                // Control frames are answered by the protocol layer.
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(Message::Close(frame))) => {
                    return Err(ReadFailure::Closed(frame.map(|f| f.code)));
                }
                Some(Err(e)) => return Err(classify_read_error(e)),
                None => return Err(ReadFailure::Closed(None)),
            }
        }
    }

    async fn push(&mut self, payload: String) -> AppResult<()> {
        self.socket
            .send(Message::Text(payload.into()))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transport, "write message", e))
    }

    async fn close(&mut self) {
        let frame = CloseFrame {
            code: close_code::NORMAL,
            reason: "".into(),
        };
        if let Err(e) = self.socket.send(Message::Close(Some(frame))).await {
            trace!(error = %e, "Close frame not delivered");
        }
    }
}

/// Maps a socket read error to a session read failure.
///
/// A peer that drops the connection without a close frame is an abnormal
/// closure (1006), not a read error.
fn classify_read_error(error: axum::Error) -> ReadFailure {
    let inner = error.into_inner();
    let abnormal = match inner.downcast_ref::<WsError>() {
        Some(WsError::ConnectionClosed | WsError::AlreadyClosed) => true,
        Some(WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake)) => true,
        Some(WsError::Io(e)) => is_disconnect(e),
        Some(_) => false,
        None => inner.downcast_ref::<io::Error>().is_some_and(is_disconnect),
    };

    if abnormal {
        trace!(error = %inner, "Peer left without closing handshake");
        ReadFailure::Closed(Some(CLOSE_ABNORMAL))
    } else {
        ReadFailure::Error(inner.to_string())
    }
}

fn is_disconnect(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::BrokenPipe
    )
}
