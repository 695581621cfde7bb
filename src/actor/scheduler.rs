//! Per-key debounce timers.
//!
//! `schedule(key, delay, task)` replaces any pending timer for `key`; only the
//! last call in a burst runs. Keys are independent of each other.
//!
//! ```ignore
//! let debouncer = Debouncer::new();
//! debouncer.schedule(key, Duration::from_millis(100), move || async move {
//!     let _ = build_tx.send(BuildMsg::Fired(key)).await;
//! });
//! ```
//!
//! A timer removes its own entry before running its task, so a replacement
//! never aborts a task that has already started.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::task::AbortHandle;

struct Timer {
    id: u64,
    handle: AbortHandle,
}

pub struct Debouncer<K> {
    timers: Arc<Mutex<FxHashMap<K, Timer>>>,
    next_id: AtomicU64,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            timers: Arc::new(Mutex::new(FxHashMap::default())),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay` unless `key` is scheduled again first.
    pub fn schedule<F, Fut>(&self, key: K, delay: Duration, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);
        let own_key = key.clone();

        // Held across spawn + insert so a zero-delay timer cannot look up its
        // entry before it exists.
        let mut guard = self.timers.lock();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut timers = timers.lock();
                if timers.get(&own_key).is_some_and(|t| t.id == id) {
                    timers.remove(&own_key);
                }
            }
            task().await;
        })
        .abort_handle();

        if let Some(previous) = guard.insert(key, Timer { id, handle }) {
            previous.handle.abort();
        }
    }

    /// Number of timers that have not fired yet.
    pub fn pending(&self) -> usize {
        self.timers.lock().len()
    }

    /// Abort every pending timer.
    pub fn cancel_all(&self) {
        for (_, timer) in self.timers.lock().drain() {
            timer.handle.abort();
        }
    }
}
