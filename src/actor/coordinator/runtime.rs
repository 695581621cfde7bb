use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::builder::BuildActor;
use crate::actor::fs::FsActor;
use crate::actor::messages::{BuildMsg, WsMsg};
use crate::actor::ws::WsActor;
use crate::core::is_shutdown;
use crate::lifecycle::LifecycleApi;

/// How long a running pipeline may take to finish after shutdown.
const BUILD_GRACE: Duration = Duration::from_secs(10);

/// Run all actors concurrently until shutdown or until one of them exits.
pub(super) async fn run_actors<A: LifecycleApi + 'static>(
    fs: FsActor,
    builder: BuildActor<A>,
    ws: WsActor,
    build_tx: mpsc::Sender<BuildMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let mut fs_handle = tokio::spawn(async move { fs.run().await });
    let mut build_handle = tokio::spawn(async move { builder.run().await });
    let mut ws_handle = tokio::spawn(async move { ws.run().await });

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() || is_shutdown() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    } else {
        tokio::select! {
            _ = &mut fs_handle => {}
            _ = &mut build_handle => {}
            _ = &mut ws_handle => {}
        }
    }

    let _ = build_tx.send(BuildMsg::Shutdown).await;
    if tokio::time::timeout(BUILD_GRACE, &mut build_handle).await.is_err() {
        crate::log!("watch"; "build still running, abandoned");
        build_handle.abort();
    }

    let _ = ws_tx.send(WsMsg::Shutdown).await;
    let _ = tokio::time::timeout(Duration::from_millis(500), &mut ws_handle).await;
    fs_handle.abort();
}
