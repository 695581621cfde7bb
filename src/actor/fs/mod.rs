//! FileSystem Actor
//!
//! Watches module, foundation, front-end and mirror roots and turns every
//! relevant change into a debounced key for the build actor.
//!
//! ```text
//! notify → EventFilter → PathRouter → Debouncer<WatchKey> → BuildMsg::Fired
//! ```
//!
//! The watcher starts in `new`, so events raised while the initial build runs
//! are buffered rather than lost.

// Drops temp files, metadata noise, ignored and output paths.
mod filter;
// Path → WatchKey.
mod router;
// Watch root attach/re-attach lifecycle.
mod watch_roots;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::RecommendedWatcher;
use rustc_hash::FxHashSet;
use thiserror::Error;
use tokio::sync::mpsc;

use super::messages::{BuildMsg, WatchKey};
use super::scheduler::Debouncer;
use crate::config::ProjectConfig;
use crate::module::ModuleSet;
use crate::utils::path::normalize_path;
use filter::EventFilter;
use router::PathRouter;
use watch_roots::WatchRoots;

/// How often missing roots are retried.
const MAINTAIN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to create file watcher: {0}")]
    Init(#[from] notify::Error),

    #[error("cannot watch `{}`: {source}", path.display())]
    Attach {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    watch_roots: WatchRoots,
    dispatcher: Dispatcher,
}

/// Filtering, routing and debouncing, independent of the watcher.
struct Dispatcher {
    filter: EventFilter,
    router: PathRouter,
    debouncer: Debouncer<WatchKey>,
    delay: Duration,
    build_tx: mpsc::Sender<BuildMsg>,
}

impl FsActor {
    pub fn new(
        roots: Vec<PathBuf>,
        build_tx: mpsc::Sender<BuildMsg>,
        config: &ProjectConfig,
        modules: Arc<ModuleSet>,
    ) -> Result<Self, WatchError> {
        // Create sync channel for notify (it doesn't support async)
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(roots);
        watch_roots.attach_existing(&mut watcher);

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            dispatcher: Dispatcher::new(config, modules, build_tx),
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let mut watcher = self.watcher;
        let mut watch_roots = self.watch_roots;
        let dispatcher = self.dispatcher;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Spawn a thread to poll notify events and send to async channel
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        let mut maintain = tokio::time::interval(MAINTAIN_INTERVAL);
        loop {
            tokio::select! {
                event = async_rx.recv() => match event {
                    Some(event) => dispatcher.dispatch(&event),
                    None => break,
                },
                _ = maintain.tick() => {
                    if dispatcher.build_tx.is_closed() {
                        break;
                    }
                    watch_roots.maintain(&mut watcher);
                }
            }
        }

        dispatcher.debouncer.cancel_all();
        crate::debug!("watch"; "stopped");
    }
}

impl Dispatcher {
    fn new(config: &ProjectConfig, modules: Arc<ModuleSet>, build_tx: mpsc::Sender<BuildMsg>) -> Self {
        Self {
            filter: EventFilter::new(config),
            router: PathRouter::new(config, modules),
            debouncer: Debouncer::new(),
            delay: config.watch.debounce(),
            build_tx,
        }
    }

    /// Keys touched by `event`, after filtering.
    fn keys(&self, event: &notify::Event) -> FxHashSet<WatchKey> {
        if !EventFilter::relevant_kind(&event.kind) {
            return FxHashSet::default();
        }

        event
            .paths
            .iter()
            .map(|path| normalize_path(path))
            .filter(|path| !self.filter.ignores(path))
            .filter_map(|path| {
                let key = self.router.route(&path);
                crate::debug!("watch"; "{:?} {} -> {:?}", event.kind, path.display(), key);
                key
            })
            .collect()
    }

    /// Restart the debounce timer of every key touched by `event`.
    fn dispatch(&self, event: &notify::Event) {
        for key in self.keys(event) {
            let build_tx = self.build_tx.clone();
            let fired = key.clone();
            self.debouncer.schedule(key, self.delay, move || async move {
                let _ = build_tx.send(BuildMsg::Fired(fired)).await;
            });
        }
    }
}
