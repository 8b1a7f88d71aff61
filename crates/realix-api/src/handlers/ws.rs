//! WebSocket upgrade handler.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocket;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{ConnectInfo, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use realix_realtime::connection::Identity;

use crate::state::AppState;
use crate::supervisor::supervise;
use crate::transport::WsTransport;

/// GET /ws — WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            state.realtime.metrics.upgrade_rejected();
            warn!(peer = %peer, error = %rejection, "upgrade connection rejected");
            return rejection.into_response();
        }
    };

    let metrics = Arc::clone(&state.realtime.metrics);
    ws.on_failed_upgrade(move |e| {
        metrics.upgrade_rejected();
        warn!(peer = %peer, error = %e, "upgrade connection failed");
    })
    .on_upgrade(move |socket| handle_ws_connection(state, peer, socket))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, peer: SocketAddr, socket: WebSocket) {
    let identity = match Identity::from_remote_addr(&peer.to_string()) {
        Ok(identity) => identity,
        Err(e) => {
            error!(peer = %peer, error = %e, "parse host");
            return;
        }
    };

    let session = state
        .realtime
        .open_session(identity.clone(), WsTransport::new(socket));
    let conn_id = session.handle().id;

    supervise(&identity, conn_id, session.run()).await;
}
