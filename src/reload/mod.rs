//! Live reload: the WebSocket listener and the post-reload restart command.
//!
//! Connected clients receive the literal text `reload` after every completed
//! pipeline. Delivery is best effort; there is no acknowledgement.

pub mod restart;
pub mod server;

/// Payload sent to every client.
pub const RELOAD_SIGNAL: &str = "reload";
