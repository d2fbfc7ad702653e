use dashmap::DashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::mpsc;

pub type WsSender = mpsc::UnboundedSender<String>;

/// In-process connection registry: one room per person id, any number
/// of live sockets per room. Disconnection only drops the live-push
/// path; persisted notifications are unaffected.
#[derive(Clone)]
pub struct NotificationHub {
    connections: Arc<DashMap<i32, Vec<(u64, WsSender)>>>,
    next_conn_id: Arc<AtomicU64>,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
            next_conn_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn subscribe(&self, person_id: i32) -> (u64, mpsc::UnboundedReceiver<String>) {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections
            .entry(person_id)
            .or_default()
            .push((conn_id, tx));
        (conn_id, rx)
    }

    pub fn unsubscribe(&self, person_id: i32, conn_id: u64) {
        if let Some(mut senders) = self.connections.get_mut(&person_id) {
            senders.retain(|(id, _)| *id != conn_id);
            if senders.is_empty() {
                drop(senders);
                self.connections.remove(&person_id);
            }
        }
    }

    pub fn send_to_person(&self, person_id: i32, message: &str) {
        if let Some(mut senders) = self.connections.get_mut(&person_id) {
            // Remove closed channels while sending
            senders.retain(|(_, sender)| sender.send(message.to_string()).is_ok());
            if senders.is_empty() {
                drop(senders);
                self.connections.remove(&person_id);
            }
        }
    }
}
