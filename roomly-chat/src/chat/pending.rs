//! Outstanding sends awaiting server confirmation.
//!
//! Every tracked temp ID reaches exactly one terminal event: a matching
//! confirmation ([`OutstandingSends::settle`]) or its timeout
//! ([`OutstandingSends::expire`]). Both remove the entry under the same
//! lock, so whichever runs second finds nothing and does nothing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::network::{RoomId, TempId};

/// Tracks a message sent but not yet confirmed.
#[derive(Debug)]
struct OutstandingSend {
    room_id: RoomId,
    resolve: oneshot::Sender<bool>,
    timeout: JoinHandle<()>,
}

/// Temp ID -> outstanding send.
#[derive(Debug, Default)]
pub(crate) struct OutstandingSends {
    entries: HashMap<TempId, OutstandingSend>,
}

impl OutstandingSends {
    /// Registers `temp_id` and arms its timeout.
    ///
    /// The receiver yields the confirmation outcome, `false` on timeout, or
    /// an error if the entry is dropped by [`OutstandingSends::drop_all`].
    pub(crate) fn track(
        sends: &Arc<Mutex<Self>>,
        temp_id: TempId,
        room_id: RoomId,
        timeout: Duration,
    ) -> oneshot::Receiver<bool> {
        let (resolve, receiver) = oneshot::channel();

        // Hold the lock while spawning so the timer cannot run before the
        // entry exists.
        let mut guard = sends.lock();
        let timer = {
            let sends = Arc::clone(sends);
            let temp_id = temp_id.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                if sends.lock().expire(&temp_id) {
                    tracing::warn!(%temp_id, ?timeout, "chat send timed out waiting for confirmation");
                }
            })
        };

        let previous = guard.entries.insert(
            temp_id,
            OutstandingSend {
                room_id,
                resolve,
                timeout: timer,
            },
        );
        if let Some(previous) = previous {
            previous.timeout.abort();
        }

        receiver
    }

    /// Resolves a send with the server's verdict.
    ///
    /// Returns false if `temp_id` is unknown or already resolved.
    pub(crate) fn settle(&mut self, temp_id: &str, confirmed: bool) -> bool {
        match self.entries.remove(temp_id) {
            Some(entry) => {
                entry.timeout.abort();
                let _ = entry.resolve.send(confirmed);
                tracing::debug!(%temp_id, room_id = entry.room_id, confirmed, "chat send settled");
                true
            }
            None => false,
        }
    }

    /// Fails a send whose timeout fired. Called from the timer itself.
    pub(crate) fn expire(&mut self, temp_id: &str) -> bool {
        match self.entries.remove(temp_id) {
            Some(entry) => {
                let _ = entry.resolve.send(false);
                true
            }
            None => false,
        }
    }

    /// Drops every entry without resolving it. Returns how many were dropped.
    pub(crate) fn drop_all(&mut self) -> usize {
        let count = self.entries.len();
        for (_, entry) in self.entries.drain() {
            entry.timeout.abort();
        }
        count
    }

    pub(crate) fn contains(&self, temp_id: &str) -> bool {
        self.entries.contains_key(temp_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
