//! Listener Registries
//!
//! Per-room message listeners and connection-state listeners.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::network::{ChatMessage, RoomId};

/// Callback invoked for each message in a room.
pub type MessageCallback = Arc<dyn Fn(&ChatMessage) + Send + Sync>;

/// Callback invoked with `true` on connect and `false` on disconnect.
pub type ConnectionCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Identifies one registration. Never reused within a registry.
pub(crate) type ListenerId = u64;

/// Room ID -> callbacks registered for that room.
///
/// A room's entry is removed as soon as its last callback is.
#[derive(Default)]
pub(crate) struct RoomListeners {
    next_id: ListenerId,
    rooms: HashMap<RoomId, Vec<(ListenerId, MessageCallback)>>,
}

impl RoomListeners {
    pub(crate) fn add(&mut self, room_id: RoomId, callback: MessageCallback) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.rooms.entry(room_id).or_default().push((id, callback));
        id
    }

    /// Removes one registration. Returns false if it was already gone.
    pub(crate) fn remove(&mut self, room_id: RoomId, id: ListenerId) -> bool {
        let Some(callbacks) = self.rooms.get_mut(&room_id) else {
            return false;
        };
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        let removed = callbacks.len() != before;
        if callbacks.is_empty() {
            self.rooms.remove(&room_id);
        }
        removed
    }

    /// Snapshot of the callbacks for a room, safe to invoke without the lock.
    pub(crate) fn callbacks_for(&self, room_id: RoomId) -> Vec<MessageCallback> {
        self.rooms
            .get(&room_id)
            .map(|callbacks| callbacks.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default()
    }

    pub(crate) fn listener_count(&self, room_id: RoomId) -> usize {
        self.rooms.get(&room_id).map_or(0, Vec::len)
    }

    pub(crate) fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub(crate) fn clear(&mut self) {
        self.rooms.clear();
    }
}

/// Connection-state listeners.
#[derive(Default)]
pub(crate) struct ConnectionListeners {
    next_id: ListenerId,
    callbacks: HashMap<ListenerId, ConnectionCallback>,
}

impl ConnectionListeners {
    pub(crate) fn add(&mut self, callback: ConnectionCallback) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.insert(id, callback);
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        self.callbacks.remove(&id).is_some()
    }

    pub(crate) fn snapshot(&self) -> Vec<ConnectionCallback> {
        self.callbacks.values().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

/// Handle returned by listener registration.
///
/// Dropping it leaves the listener registered; call
/// [`Subscription::unsubscribe`] to remove exactly this registration.
#[must_use = "call unsubscribe() to remove the listener"]
pub struct Subscription {
    cancel: Box<dyn FnOnce() + Send + Sync>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Subscription {
            cancel: Box::new(cancel),
        }
    }

    /// Removes the listener. Other registrations are unaffected.
    pub fn unsubscribe(self) {
        (self.cancel)();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
