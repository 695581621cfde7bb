use std::net::TcpListener;
use std::time::Duration;

use tokio::sync::mpsc;
use tungstenite::protocol::Message;

use super::*;
use crate::reload::server::start_ws_server;

fn connect(port: u16) -> WebSocket<tungstenite::stream::MaybeTlsStream<TcpStream>> {
    let (socket, _response) = tungstenite::connect(format!("ws://127.0.0.1:{port}")).unwrap();
    socket
}

#[test]
fn test_broadcast_without_clients() {
    let (_tx, rx) = mpsc::channel(1);
    let actor = WsActor::new(rx, Vec::new());
    assert_eq!(actor.broadcast_reload(), 0);
}

#[test]
fn test_broadcast_reaches_client() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let client = std::thread::spawn(move || {
        let mut socket = connect(port);
        socket.read().unwrap()
    });

    let (_tx, rx) = mpsc::channel(1);
    let actor = WsActor::new(rx, Vec::new());
    let (stream, _) = listener.accept().unwrap();
    actor.add_client(stream);

    assert_eq!(actor.broadcast_reload(), 1);
    assert_eq!(client.join().unwrap(), Message::Text("reload".to_string().into()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reload_end_to_end() {
    let (tx, rx) = mpsc::channel(8);
    let port = start_ws_server(0, tx.clone()).unwrap();
    let actor = tokio::spawn(WsActor::new(rx, Vec::new()).run());

    let mut socket = tokio::task::spawn_blocking(move || connect(port))
        .await
        .unwrap();

    tx.send(WsMsg::Reload {
        reason: "ns/foo rebuilt".into(),
    })
    .await
    .unwrap();

    let msg = tokio::task::spawn_blocking(move || socket.read().unwrap())
        .await
        .unwrap();
    assert_eq!(msg.into_text().unwrap().as_str(), "reload");

    tx.send(WsMsg::Shutdown).await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), actor)
        .await
        .unwrap()
        .unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_restart_command_runs_after_reload() {
    let dir = tempfile::TempDir::new().unwrap();
    let marker = dir.path().join("restarted");
    let command = vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("touch {}", marker.display()),
    ];

    let (tx, rx) = mpsc::channel(8);
    let actor = tokio::spawn(WsActor::new(rx, command).run());
    tx.send(WsMsg::Reload {
        reason: "mirror changed".into(),
    })
    .await
    .unwrap();
    tx.send(WsMsg::Shutdown).await.unwrap();
    actor.await.unwrap();

    assert!(marker.exists());
}
