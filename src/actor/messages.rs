//! Actor Message Definitions
//!
//! ```text
//! FsActor --Fired--> BuildActor --Reload--> WsActor
//! ```

use std::fmt;
use std::net::TcpStream;

use crate::build::BuildTarget;

/// Debounce key of a watched path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WatchKey {
    /// Sources of a build target changed.
    Target(BuildTarget),
    /// The host's generated resource mirror changed; reload only.
    Mirror,
}

impl fmt::Display for WatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target(target) => write!(f, "{target}"),
            Self::Mirror => f.write_str("mirror"),
        }
    }
}

/// Messages to the build actor
#[derive(Debug)]
pub enum BuildMsg {
    /// A debounce timer for `key` fired.
    Fired(WatchKey),
    Shutdown,
}

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Broadcast `reload`, then run the restart command.
    Reload { reason: String },
    /// Accepted connection awaiting the WebSocket handshake.
    AddClient(TcpStream),
    Shutdown,
}
