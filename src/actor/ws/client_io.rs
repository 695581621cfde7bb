use std::net::TcpStream;
use std::time::Duration;

use tungstenite::protocol::Message;

use super::{Clients, WsActor};
use crate::{debug, log};

/// Read poll interval of the background reader.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl WsActor {
    /// Complete the handshake and register the client.
    pub(super) fn add_client(&self, stream: TcpStream) {
        // Keep blocking mode during handshake, switch to non-blocking after
        match tungstenite::accept(stream) {
            Ok(ws) => {
                let _ = ws.get_ref().set_nonblocking(true);
                let mut clients = self.clients.lock();
                clients.push(ws);
                debug!("reload"; "client connected (total: {})", clients.len());
            }
            Err(e) => {
                log!("reload"; "handshake failed: {}", e);
            }
        }
    }

    /// Background thread draining client frames (non-blocking poll) so closed
    /// connections are noticed between broadcasts. Exits once the actor has
    /// dropped its handle.
    pub(super) fn client_reader_loop(clients: Clients) {
        while std::sync::Arc::strong_count(&clients) > 1 {
            std::thread::sleep(POLL_INTERVAL);

            let mut clients = clients.lock();
            clients.retain_mut(|ws| match ws.read() {
                Ok(Message::Close(_)) => false,
                Ok(_) => true,
                Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    true
                }
                Err(_) => false,
            });
        }
    }
}
