//! Build Actor - the single build worker
//!
//! Consumes fired debounce keys and runs one pipeline at a time:
//!
//! ```text
//! Fired(key) → queue → build → lifecycle sync → Reload
//! ```
//!
//! Keys fired while a pipeline runs wait in a FIFO holding at most one entry
//! per key. Nothing is dropped and nothing runs concurrently, so pipelines
//! complete in fire order.

mod pipeline;


use std::collections::VecDeque;

use tokio::sync::mpsc;

use super::messages::{BuildMsg, WatchKey, WsMsg};
use crate::build::{BuildResult, Executor};
use crate::debug;
use crate::lifecycle::{LifecycleApi, SyncAction};

/// What one pipeline did, for logging and tests.
#[derive(Debug)]
pub struct PipelineReport {
    pub key: WatchKey,
    /// `None` for reload-only keys.
    pub build: Option<BuildResult>,
    /// `None` when lifecycle sync is disabled or the build failed.
    pub lifecycle: Option<Result<SyncAction, String>>,
    pub reloaded: bool,
}

impl PipelineReport {
    fn new(key: WatchKey) -> Self {
        Self {
            key,
            build: None,
            lifecycle: None,
            reloaded: false,
        }
    }
}

pub struct BuildActor<A> {
    rx: mpsc::Receiver<BuildMsg>,
    executor: Executor,
    lifecycle: Option<A>,
    ws_tx: Option<mpsc::Sender<WsMsg>>,
    queue: VecDeque<WatchKey>,
}

impl<A: LifecycleApi> BuildActor<A> {
    pub fn new(
        rx: mpsc::Receiver<BuildMsg>,
        executor: Executor,
        lifecycle: Option<A>,
        ws_tx: Option<mpsc::Sender<WsMsg>>,
    ) -> Self {
        Self {
            rx,
            executor,
            lifecycle,
            ws_tx,
            queue: VecDeque::new(),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(key) = self.next().await {
            self.process(key).await;
        }
        debug!("build"; "stopped ({} queued)", self.queue.len());
    }

    /// Next key to build. Waits only when the queue is empty; everything
    /// that arrived during the previous pipeline is queued first.
    async fn next(&mut self) -> Option<WatchKey> {
        if self.queue.is_empty() {
            let msg = self.rx.recv().await?;
            if !self.accept(msg) {
                return None;
            }
        }
        while let Ok(msg) = self.rx.try_recv() {
            if !self.accept(msg) {
                return None;
            }
        }
        self.queue.pop_front()
    }

    /// Returns `false` on shutdown.
    fn accept(&mut self, msg: BuildMsg) -> bool {
        match msg {
            BuildMsg::Fired(key) => {
                self.enqueue(key);
                true
            }
            BuildMsg::Shutdown => false,
        }
    }

    fn enqueue(&mut self, key: WatchKey) {
        if self.queue.contains(&key) {
            debug!("build"; "{} already queued", key);
        } else {
            self.queue.push_back(key);
        }
    }
}
