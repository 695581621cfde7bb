//! Actor system for watch mode.
//!
//! ```text
//! FsActor --(debounced key)--> BuildActor --Reload--> WsActor --> clients
//! (watch)                      (build, sync)          (broadcast, restart)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `scheduler` - Per-key debounce timers
//! - `fs` - File system watcher, path routing
//! - `builder` - Single build worker: build, lifecycle sync, reload
//! - `ws` - WebSocket broadcast
//! - `coordinator` - Wires up and runs actors

pub mod builder;
pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod scheduler;
pub mod ws;

pub use coordinator::Coordinator;
