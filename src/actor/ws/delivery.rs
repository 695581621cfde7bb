use tungstenite::protocol::Message;

use super::WsActor;
use crate::debug;
use crate::reload::RELOAD_SIGNAL;

impl WsActor {
    /// Send the reload signal to every client. Returns how many received it.
    pub(super) fn broadcast_reload(&self) -> usize {
        self.broadcast(Message::Text(RELOAD_SIGNAL.to_string().into()))
    }

    /// Broadcast a message to all connected clients, dropping the ones that
    /// cannot be written to.
    pub(super) fn broadcast(&self, msg: Message) -> usize {
        let mut clients = self.clients.lock();
        if clients.is_empty() {
            debug!("reload"; "no clients connected");
            return 0;
        }

        clients.retain_mut(|ws| match ws.send(msg.clone()) {
            Ok(()) => true,
            Err(e) => {
                debug!("reload"; "client disconnected: {}", e);
                false
            }
        });
        debug!("reload"; "broadcast to {} clients", clients.len());
        clients.len()
    }
}
