//! Integration tests for the WebSocket push endpoint.

mod helpers;

use std::collections::HashSet;

use futures::SinkExt;
use tokio_tungstenite::tungstenite::Message;

use realix_realtime::connection::Identity;

use helpers::{TestServer, next_json, random_number, wait_closed};

fn loopback() -> Identity {
    Identity::from_remote_addr("127.0.0.1:0").unwrap()
}

#[tokio::test]
async fn test_each_message_gets_one_value() {
    let server = TestServer::spawn("10000").await;
    let mut client = server.connect().await;

    client.send(Message::text("anything")).await.unwrap();
    let n = random_number(&next_json(&mut client).await);
    assert!((1..=10000).contains(&n));

    client.send(Message::binary(vec![1, 2, 3])).await.unwrap();
    let m = random_number(&next_json(&mut client).await);
    assert_ne!(n, m);

    server.stop().await;
}

#[tokio::test]
async fn test_same_origin_replaces_previous_connection() {
    let server = TestServer::spawn("10000").await;

    let mut first = server.connect().await;
    first.send(Message::text("hello")).await.unwrap();
    random_number(&next_json(&mut first).await);

    let first_conn = server
        .state
        .realtime
        .registry
        .lookup(&loopback())
        .expect("first registered")
        .id;

    let mut second = server.connect().await;

    assert!(wait_closed(&mut first).await, "first connection was not closed");
    assert!(first.send(Message::text("again")).await.is_err());

    assert!(
        server
            .eventually(|s| s
                .realtime
                .registry
                .lookup(&loopback())
                .is_some_and(|h| h.id != first_conn))
            .await
    );

    second.send(Message::text("hello")).await.unwrap();
    random_number(&next_json(&mut second).await);

    assert_eq!(server.state.realtime.registry.active_count(), 1);
    assert_eq!(
        server.state.realtime.metrics.snapshot().connections_replaced,
        1
    );

    server.stop().await;
}

#[tokio::test]
async fn test_client_close_removes_registration() {
    let server = TestServer::spawn("10000").await;
    let mut client = server.connect().await;

    client.send(Message::text("x")).await.unwrap();
    next_json(&mut client).await;
    assert!(server.eventually(|s| s.realtime.registry.active_count() == 1).await);

    client.close(None).await.unwrap();

    assert!(server.eventually(|s| s.realtime.registry.active_count() == 0).await);
    assert!(
        server
            .eventually(|s| s.realtime.metrics.snapshot().connections_active == 0)
            .await
    );

    server.stop().await;
}

#[tokio::test]
async fn test_dropped_client_is_an_expected_closure() {
    let server = TestServer::spawn("10000").await;
    let mut client = server.connect().await;

    client.send(Message::text("x")).await.unwrap();
    next_json(&mut client).await;
    assert!(server.eventually(|s| s.realtime.registry.active_count() == 1).await);

    // No close frame: the TCP stream just goes away.
    drop(client);

    assert!(server.eventually(|s| s.realtime.registry.active_count() == 0).await);
    assert!(
        server
            .eventually(|s| s.realtime.metrics.snapshot().connections_active == 0)
            .await
    );
    assert_eq!(server.state.realtime.metrics.snapshot().read_errors, 0);

    server.stop().await;
}

#[tokio::test]
async fn test_sessions_survive_listener_shutdown() {
    let server = TestServer::spawn("10000").await;
    let mut client = server.connect().await;
    client.send(Message::text("x")).await.unwrap();
    next_json(&mut client).await;

    let state = server.state.clone();
    server.stop().await;

    client.send(Message::text("still there?")).await.unwrap();
    random_number(&next_json(&mut client).await);
    assert_eq!(state.realtime.registry.active_count(), 1);
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_origins_concurrently_get_unique_values() {
    let server = TestServer::spawn("1000000000000").await;

    let mut clients = Vec::new();
    for i in 1..=50 {
        clients.push(server.connect_from(&format!("127.0.0.{i}")).await);
    }
    assert!(server.eventually(|s| s.realtime.registry.active_count() == 50).await);

    let mut tasks = tokio::task::JoinSet::new();
    for mut client in clients {
        tasks.spawn(async move {
            let mut values = Vec::with_capacity(10);
            for _ in 0..10 {
                client.send(Message::text("next")).await.unwrap();
                values.push(random_number(&next_json(&mut client).await));
            }
            (client, values)
        });
    }

    let mut all = Vec::new();
    let mut clients = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (client, values) = joined.unwrap();
        all.extend(values);
        clients.push(client);
    }

    assert_eq!(all.len(), 500);
    let unique: HashSet<_> = all.iter().collect();
    assert_eq!(unique.len(), 500);

    assert_eq!(server.state.realtime.registry.active_count(), 50);
    assert!(
        server
            .eventually(|s| s.realtime.metrics.snapshot().values_pushed == 500)
            .await
    );
    assert_eq!(server.state.realtime.metrics.snapshot().connections_replaced, 0);

    drop(clients);
    server.stop().await;
}
