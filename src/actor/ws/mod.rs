//! WebSocket Actor - live-reload broadcast
//!
//! ```text
//! BuildActor --Reload--> WsActor --"reload"--> Clients
//!                           |
//!                           +--> restart command (optional)
//! ```
//!
//! Clients are owned here. A client whose send fails, or that closes its
//! side, is dropped. There is no acknowledgement.

mod client_io;
mod delivery;

#[cfg(test)]
mod tests;

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;

use super::messages::WsMsg;
use crate::debug;
use crate::reload::restart;

type Clients = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    rx: mpsc::Receiver<WsMsg>,
    /// Connected clients (shared for broadcast + read threads)
    clients: Clients,
    restart_command: Vec<String>,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>, restart_command: Vec<String>) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
            restart_command,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let clients_for_reader = Arc::clone(&self.clients);
        std::thread::spawn(move || {
            Self::client_reader_loop(clients_for_reader);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Reload { reason } => {
                    debug!("reload"; "{}", reason);
                    self.broadcast_reload();
                    restart::run_logged(&self.restart_command).await;
                }
                WsMsg::AddClient(stream) => {
                    self.add_client(stream);
                }
                WsMsg::Shutdown => {
                    debug!("reload"; "shutting down");
                    let mut clients = self.clients.lock();
                    for mut ws in clients.drain(..) {
                        let _ = ws.close(None);
                    }
                    break;
                }
            }
        }
    }
}
