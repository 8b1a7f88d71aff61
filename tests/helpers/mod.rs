//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use futures::StreamExt;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use realix_api::AppState;
use realix_core::config::AppConfig;
use realix_realtime::server::RealtimeEngine;

/// Client stream type returned by `connect_async`.
pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Generous bound for anything the server should do promptly.
pub const STEP: Duration = Duration::from_secs(5);

/// A server bound to an ephemeral loopback port.
pub struct TestServer {
    /// Address the server listens on.
    pub addr: SocketAddr,
    /// Shared state, for inspecting the engine directly.
    pub state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Start a server drawing from `[1, upper_bound]`.
    pub async fn spawn(upper_bound: &str) -> Self {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.allocator.upper_bound = upper_bound.to_string();

        let engine = RealtimeEngine::new(&config.allocator, config.realtime.clone())
            .expect("engine");
        let state = AppState::new(config, engine);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let (tx, rx) = oneshot::channel::<()>();
        let serve_state = state.clone();
        let task = tokio::spawn(async move {
            realix_api::serve(listener, serve_state, async {
                let _ = rx.await;
            })
            .await
            .expect("serve");
        });

        Self {
            addr,
            state,
            shutdown: Some(tx),
            task,
        }
    }

    /// `ws://` URL of the upgrade endpoint.
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Open a client connection from the default loopback address.
    pub async fn connect(&self) -> Client {
        let (client, _) = tokio_tungstenite::connect_async(self.ws_url())
            .await
            .expect("connect");
        client
    }

    /// Open a client connection whose source address is `source_ip`.
    pub async fn connect_from(&self, source_ip: &str) -> WebSocketStream<TcpStream> {
        let socket = TcpSocket::new_v4().expect("socket");
        socket
            .bind(format!("{source_ip}:0").parse().expect("source addr"))
            .expect("bind source");
        let stream = socket.connect(self.addr).await.expect("tcp connect");
        let (client, _) = tokio_tungstenite::client_async(self.ws_url(), stream)
            .await
            .expect("handshake");
        client
    }

    /// Stop accepting and wait for the accept loop to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(STEP, &mut self.task).await;
    }

    /// Poll `check` until it holds or `STEP` elapses.
    pub async fn eventually(&self, check: impl Fn(&AppState) -> bool) -> bool {
        let deadline = tokio::time::Instant::now() + STEP;
        while tokio::time::Instant::now() < deadline {
            if check(&self.state) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        check(&self.state)
    }
}

/// Read frames until a text frame arrives and parse it as JSON.
pub async fn next_json<S>(client: &mut WebSocketStream<S>) -> serde_json::Value
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    loop {
        let frame = tokio::time::timeout(STEP, client.next())
            .await
            .expect("timed out waiting for a push")
            .expect("stream ended")
            .expect("read error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("json");
        }
    }
}

/// Read until the server closes the connection.
pub async fn wait_closed<S>(client: &mut WebSocketStream<S>) -> bool
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    tokio::time::timeout(STEP, async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await
    .is_ok()
}

/// Extract `random_number` as a u64.
pub fn random_number(json: &serde_json::Value) -> u64 {
    assert_eq!(json.as_object().map(|o| o.len()), Some(1), "one field: {json}");
    json["random_number"]
        .as_u64()
        .unwrap_or_else(|| panic!("random_number missing or not an integer: {json}"))
}
