//! Actor Coordinator - wires up the watch-mode actor system
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Starts the watcher before the initial build so no change is lost
//! - Runs the initial full pass, then the actors until shutdown

mod runtime;
mod watch_paths;

use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::builder::BuildActor;
use super::fs::FsActor;
use super::messages::{BuildMsg, WsMsg};
use super::ws::WsActor;
use crate::build::{Executor, build_all};
use crate::config::ProjectConfig;
use crate::lifecycle::LifecycleClient;
use crate::module::ModuleSet;
use crate::reload::server::start_ws_server;
use crate::{debug, log};

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<ProjectConfig>,
    modules: Arc<ModuleSet>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(config: Arc<ProjectConfig>, modules: Arc<ModuleSet>) -> Self {
        Self {
            config,
            modules,
            shutdown_rx: None,
        }
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(mut self) -> Result<()> {
        let (build_tx, build_rx) = mpsc::channel::<BuildMsg>(CHANNEL_BUFFER);
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        let reload = &self.config.reload;
        if reload.enable {
            match start_ws_server(reload.port, ws_tx.clone()) {
                Ok(port) => log!("reload"; "listening on ws://127.0.0.1:{}", port),
                Err(e) => log!("reload"; "websocket server failed: {:#}", e),
            }
        }

        let lifecycle = LifecycleClient::from_config(&self.config.lifecycle).unwrap_or_else(|e| {
            log!("warning"; "lifecycle sync disabled: {}", e);
            None
        });

        // Watcher first: changes made during the initial pass are buffered.
        let watch_paths = watch_paths::collect_watch_paths(&self.config);
        let fs_actor = FsActor::new(
            watch_paths,
            build_tx.clone(),
            &self.config,
            Arc::clone(&self.modules),
        )
        .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;

        let executor = Executor::new(Arc::clone(&self.config), Arc::clone(&self.modules));
        build_all(&executor).await.log_summary();

        let build_actor = BuildActor::new(build_rx, executor, lifecycle, Some(ws_tx.clone()));
        let ws_actor = WsActor::new(ws_rx, self.config.reload.restart_command.clone());

        log!("watch"; "watching {} for changes", crate::utils::plural_count(self.modules.len(), "module"));
        debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        runtime::run_actors(fs_actor, build_actor, ws_actor, build_tx, ws_tx, shutdown_rx).await;

        debug!("actor"; "stopped");
        Ok(())
    }
}
