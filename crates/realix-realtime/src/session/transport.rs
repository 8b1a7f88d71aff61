//! The seam between the session loop and a concrete connection.

use std::fmt;

use async_trait::async_trait;

use realix_core::result::AppResult;

/// Close code for a normal closure.
pub const CLOSE_NORMAL: u16 = 1000;
/// Close code for an endpoint going away.
pub const CLOSE_GOING_AWAY: u16 = 1001;
/// Close code for a connection dropped without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;

/// Why waiting for the next inbound unit ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadFailure {
    /// The peer closed the connection, with the close code if one was sent.
    Closed(Option<u16>),
    /// The read failed for any other reason.
    Error(String),
}

impl ReadFailure {
    /// Returns `true` for ordinary disconnects, which are not worth a warning.
    ///
    /// That covers normal, going-away, and abnormal closure codes, and a
    /// stream that ended with no close frame at all.
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Closed(None) => true,
            Self::Closed(Some(code)) => {
                matches!(*code, CLOSE_NORMAL | CLOSE_GOING_AWAY | CLOSE_ABNORMAL)
            }
            Self::Error(_) => false,
        }
    }
}

impl fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed(Some(code)) => write!(f, "closed with code {code}"),
            Self::Closed(None) => write!(f, "closed without close frame"),
            Self::Error(message) => write!(f, "{message}"),
        }
    }
}

/// A bidirectional message connection as seen by a session.
#[async_trait]
pub trait SessionTransport: Send {
    /// Waits for the next inbound data unit; its content is discarded.
    ///
    /// Must be cancel-safe: the session races it against the handle's close
    /// signal and may drop the future before it resolves.
    async fn next_inbound(&mut self) -> Result<(), ReadFailure>;

    /// Sends one text payload.
    async fn push(&mut self, payload: String) -> AppResult<()>;

    /// Closes the connection. Errors are swallowed; the peer may already be gone.
    async fn close(&mut self);
}
