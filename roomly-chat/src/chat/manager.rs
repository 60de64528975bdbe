// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Chat Connection Manager
//!
//! Owns the single authenticated chat connection: handshake, confirmation
//! tracking for sends, listener fan-out, and reconnection.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::config::ChatConfig;
use super::credentials::CredentialProvider;
use super::listeners::{ConnectionListeners, RoomListeners, Subscription};
use super::pending::OutstandingSends;
use crate::network::{
    decode_event, encode_command, endpoint_url, new_temp_id, normalize_message, ChatMessage,
    ClientCommand, CloseCode, ConnectionState, MessageReceived, Outbound, RoomId,
    SendConfirmation, SendMessage, ServerEvent, Transport, TransportChannel, TransportEvent,
    WebSocketTransport,
};

/// Chat connection manager.
///
/// Cheap to clone; clones share one connection, one listener registry and
/// one outstanding-send table. Failures never surface as errors: they are
/// logged, and reported through `send_message`'s boolean and the
/// connection-state listeners.
///
/// Must be used from within a tokio runtime.
///
/// # Example
///
/// ```ignore
/// use roomly_chat::{ChatConfig, ChatManager, StaticToken};
///
/// let chat = ChatManager::with_websocket(
///     ChatConfig::new("wss://chat.roomly.app/ws"),
///     StaticToken::new(token),
/// );
///
/// let banner = chat.on_connection_change(|connected| show_banner(!connected));
/// let room = chat.on_message_for_room(42, |msg| render(msg));
///
/// chat.connect().await;
/// if !chat.send_message(42, "hi").await {
///     show_retry();
/// }
/// ```
#[derive(Clone)]
pub struct ChatManager {
    inner: Arc<Inner>,
}

struct Inner {
    config: ChatConfig,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialProvider>,
    session: Mutex<Session>,
    rooms: Arc<Mutex<RoomListeners>>,
    connection_listeners: Arc<Mutex<ConnectionListeners>>,
    sends: Arc<Mutex<OutstandingSends>>,
}

/// Connection bookkeeping.
///
/// `epoch` advances on every teardown (client or server initiated).
/// Events and connect completions carrying an older epoch are ignored.
struct Session {
    state: ConnectionState,
    epoch: u64,
    link: Option<Link>,
    pending_reconnect: Option<JoinHandle<()>>,
}

/// The live transport.
struct Link {
    outbound: mpsc::UnboundedSender<Outbound>,
    reader: Option<JoinHandle<()>>,
}

impl Link {
    fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Asks the transport to close. The reader keeps running until the
    /// transport reports the close, which is then ignored as stale.
    fn close(self) {
        let _ = self.outbound.send(Outbound::Close);
    }

    /// Closes the transport and stops the reader immediately.
    fn shutdown(self) {
        if let Some(reader) = &self.reader {
            reader.abort();
        }
        self.close();
    }
}

/// Resets `Connecting` if a connect attempt ends without opening, including
/// when the connect future is dropped mid-flight.
struct AttemptGuard<'a> {
    manager: &'a ChatManager,
    epoch: u64,
    armed: bool,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut session = self.manager.inner.session.lock();
            if session.epoch == self.epoch && session.state == ConnectionState::Connecting {
                session.state = ConnectionState::Disconnected;
            }
        }
    }
}

impl ChatManager {
    /// Creates a manager over an arbitrary transport.
    pub fn new(
        config: ChatConfig,
        transport: impl Transport + 'static,
        credentials: impl CredentialProvider + 'static,
    ) -> Self {
        ChatManager {
            inner: Arc::new(Inner {
                config,
                transport: Arc::new(transport),
                credentials: Arc::new(credentials),
                session: Mutex::new(Session {
                    state: ConnectionState::Disconnected,
                    epoch: 0,
                    link: None,
                    pending_reconnect: None,
                }),
                rooms: Arc::new(Mutex::new(RoomListeners::default())),
                connection_listeners: Arc::new(Mutex::new(ConnectionListeners::default())),
                sends: Arc::new(Mutex::new(OutstandingSends::default())),
            }),
        }
    }

    /// Creates a manager over the production WebSocket transport.
    pub fn with_websocket(
        config: ChatConfig,
        credentials: impl CredentialProvider + 'static,
    ) -> Self {
        let transport = WebSocketTransport::new(config.connect_timeout());
        Self::new(config, transport, credentials)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.inner.config
    }

    /// Authenticates and opens the connection.
    ///
    /// No-op while connected or while another attempt is in flight. A
    /// missing credential or a failed handshake is logged and ends the
    /// attempt; it is not retried. Returns once the attempt is over; check
    /// [`ChatManager::is_connected`] for the outcome.
    pub async fn connect(&self) {
        let epoch = {
            let mut session = self.inner.session.lock();
            match session.state {
                ConnectionState::Connected => {
                    debug!("chat already connected");
                    return;
                }
                ConnectionState::Connecting => {
                    debug!("chat connection attempt already in progress");
                    return;
                }
                ConnectionState::Disconnected => {}
            }
            session.state = ConnectionState::Connecting;
            session.epoch
        };
        let mut guard = AttemptGuard {
            manager: self,
            epoch,
            armed: true,
        };

        let Some(token) = self.inner.credentials.bearer_token().await else {
            error!("no bearer token available, not connecting to chat");
            return;
        };

        let url = match endpoint_url(&self.inner.config.server_url, &token) {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, server = %self.inner.config.server_url, "bad chat endpoint");
                return;
            }
        };

        let channel = match self.inner.transport.open(url.as_str()).await {
            Ok(channel) => channel,
            Err(e) => {
                error!(error = %e, server = %self.inner.config.server_url, "failed to open chat connection");
                return;
            }
        };

        if self.finish_open(epoch, channel) {
            guard.armed = false;
        }
    }

    /// Installs an opened transport unless a teardown happened meanwhile.
    fn finish_open(&self, epoch: u64, channel: TransportChannel) -> bool {
        let TransportChannel { outbound, events } = channel;
        {
            let mut session = self.inner.session.lock();
            if session.epoch != epoch || session.state != ConnectionState::Connecting {
                warn!("chat connection superseded while opening, discarding it");
                let _ = outbound.send(Outbound::Close);
                return false;
            }
            session.state = ConnectionState::Connected;
            session.link = Some(Link {
                outbound,
                reader: None,
            });
            if let Some(timer) = session.pending_reconnect.take() {
                timer.abort();
            }
        }

        info!(server = %self.inner.config.server_url, "chat connected");
        self.notify_connection(true);

        let reader = tokio::spawn(read_loop(Arc::downgrade(&self.inner), epoch, events));
        let mut session = self.inner.session.lock();
        let current = session.epoch == epoch;
        match session.link.as_mut() {
            Some(link) if current => link.reader = Some(reader),
            _ => reader.abort(),
        }
        true
    }

    /// Returns true iff a transport exists and is open.
    pub fn is_connected(&self) -> bool {
        let session = self.inner.session.lock();
        session.state == ConnectionState::Connected
            && session.link.as_ref().is_some_and(Link::is_open)
    }

    /// Returns the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.inner.session.lock().state
    }

    /// Closes the connection and cancels any scheduled reconnect.
    ///
    /// Clears every room listener and drops outstanding sends without
    /// resolving them: their `send_message` futures complete with `false`
    /// without a confirmation or timeout having occurred. Connection-state
    /// listeners stay registered. Safe to call when already disconnected.
    pub fn disconnect(&self) {
        let was_connected = {
            let mut session = self.inner.session.lock();
            if let Some(timer) = session.pending_reconnect.take() {
                timer.abort();
            }
            session.epoch += 1;
            let was_connected = session.state == ConnectionState::Connected;
            session.state = ConnectionState::Disconnected;
            if let Some(link) = session.link.take() {
                link.shutdown();
            }
            was_connected
        };

        self.inner.rooms.lock().clear();
        let dropped = self.inner.sends.lock().drop_all();
        info!(dropped_sends = dropped, "chat disconnected by client");

        if was_connected {
            self.notify_connection(false);
        }
    }

    /// Sends `text` to a room and waits for the server's verdict.
    ///
    /// Resolves `false` immediately when not connected, `false` when the
    /// server rejects the message or no confirmation arrives within the
    /// configured timeout, and `true` when the server confirms it.
    pub async fn send_message(&self, room_id: RoomId, text: impl Into<String>) -> bool {
        let Some(outbound) = self.live_outbound() else {
            error!(room_id, "cannot send chat message, not connected");
            return false;
        };

        let temp_id = new_temp_id();
        let command = ClientCommand::SendMessage(SendMessage {
            room_id,
            message: text.into(),
            message_temp_id: temp_id.clone(),
        });
        let frame = match encode_command(&command) {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, room_id, "failed to encode chat message");
                return false;
            }
        };

        // Track before writing so a fast confirmation always finds its entry
        let receiver = OutstandingSends::track(
            &self.inner.sends,
            temp_id.clone(),
            room_id,
            self.inner.config.send_timeout(),
        );

        if outbound.send(Outbound::Text(frame)).is_err() {
            warn!(room_id, %temp_id, "chat transport closed before send");
            let _ = self.inner.sends.lock().settle(&temp_id, false);
        } else {
            debug!(room_id, %temp_id, "chat message sent");
        }

        match receiver.await {
            Ok(confirmed) => confirmed,
            Err(_) => {
                debug!(%temp_id, "outstanding send dropped by disconnect");
                false
            }
        }
    }

    /// Registers `callback` for messages in `room_id`.
    pub fn on_message_for_room(
        &self,
        room_id: RoomId,
        callback: impl Fn(&ChatMessage) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.rooms.lock().add(room_id, Arc::new(callback));
        let rooms = Arc::downgrade(&self.inner.rooms);
        Subscription::new(move || {
            if let Some(rooms) = rooms.upgrade() {
                rooms.lock().remove(room_id, id);
            }
        })
    }

    /// Registers `callback` for connectivity transitions.
    pub fn on_connection_change(
        &self,
        callback: impl Fn(bool) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.connection_listeners.lock().add(Arc::new(callback));
        let listeners = Arc::downgrade(&self.inner.connection_listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.lock().remove(id);
            }
        })
    }

    /// Number of sends awaiting confirmation.
    pub fn outstanding_sends(&self) -> usize {
        self.inner.sends.lock().len()
    }

    /// Returns true while a reconnect attempt is scheduled.
    pub fn reconnect_pending(&self) -> bool {
        self.inner.session.lock().pending_reconnect.is_some()
    }

    /// Number of listeners registered for `room_id`.
    pub fn room_listener_count(&self, room_id: RoomId) -> usize {
        self.inner.rooms.lock().listener_count(room_id)
    }

    /// Number of rooms with at least one listener.
    pub fn listened_room_count(&self) -> usize {
        self.inner.rooms.lock().room_count()
    }

    /// Number of connection-state listeners.
    pub fn connection_listener_count(&self) -> usize {
        self.inner.connection_listeners.lock().len()
    }

    fn live_outbound(&self) -> Option<mpsc::UnboundedSender<Outbound>> {
        let session = self.inner.session.lock();
        if session.state != ConnectionState::Connected {
            return None;
        }
        session
            .link
            .as_ref()
            .filter(|link| link.is_open())
            .map(|link| link.outbound.clone())
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.inner.session.lock().epoch == epoch
    }

    /// Handles one inbound payload. Malformed payloads are logged and skipped.
    fn dispatch(&self, epoch: u64, raw: &str) {
        let event = match decode_event(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "dropping malformed chat event");
                return;
            }
        };

        match event {
            ServerEvent::MessageReceived(received) => self.deliver(received),
            ServerEvent::MessageSentConfirmation(confirmation) => self.confirm(confirmation),
            ServerEvent::Disconnection(disconnection) => self.handle_disconnection(
                epoch,
                Some(disconnection.code),
                &disconnection.reason,
            ),
        }
    }

    fn deliver(&self, received: MessageReceived) {
        let message = normalize_message(received);
        let callbacks = self.inner.rooms.lock().callbacks_for(message.room_id);
        debug!(
            room_id = message.room_id,
            listeners = callbacks.len(),
            "chat message received"
        );
        for callback in callbacks {
            callback(&message);
        }
    }

    fn confirm(&self, confirmation: SendConfirmation) {
        let temp_id = confirmation.message_id;
        if !self.inner.sends.lock().settle(&temp_id, confirmation.confirmed) {
            debug!(%temp_id, "ignoring confirmation for unknown or expired send");
            return;
        }
        if !confirmation.confirmed {
            warn!(
                %temp_id,
                reason = confirmation.reason.as_deref().unwrap_or(""),
                "chat message rejected by server"
            );
        }
    }

    /// Tears down the connection identified by `epoch` and applies the
    /// reconnect policy. Ignored if that connection is already gone.
    fn handle_disconnection(&self, epoch: u64, code: Option<u16>, reason: &str) {
        let close = code.map(CloseCode::from_u16);
        let transient = close.is_some_and(CloseCode::is_transient);

        let was_connected = {
            let mut session = self.inner.session.lock();
            if session.epoch != epoch {
                return;
            }
            session.epoch += 1;
            let was_connected = session.state == ConnectionState::Connected;
            session.state = ConnectionState::Disconnected;
            if let Some(link) = session.link.take() {
                link.close();
            }
            if transient && session.pending_reconnect.is_none() {
                let next_epoch = session.epoch;
                session.pending_reconnect = Some(self.schedule_reconnect(next_epoch));
            }
            was_connected
        };

        warn!(
            ?code,
            description = close.map_or("Unknown", CloseCode::description),
            reason,
            reconnect = transient,
            "chat disconnected"
        );

        if was_connected {
            self.notify_connection(false);
        }
    }

    /// Spawns the reconnect timer. Called with the session lock held.
    fn schedule_reconnect(&self, epoch: u64) -> JoinHandle<()> {
        let inner = Arc::downgrade(&self.inner);
        let delay = self.inner.config.reconnect_delay();
        info!(?delay, "chat reconnect scheduled");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let manager = ChatManager { inner };

            {
                let mut session = manager.inner.session.lock();
                // A client disconnect since scheduling cancels the attempt
                if session.epoch != epoch {
                    return;
                }
                // Detach first so a successful open does not abort this task
                session.pending_reconnect = None;
            }

            info!("reconnecting to chat");
            manager.connect().await;
        })
    }

    fn notify_connection(&self, connected: bool) {
        let callbacks = self.inner.connection_listeners.lock().snapshot();
        for callback in callbacks {
            callback(connected);
        }
    }
}

/// Pumps transport events for the connection identified by `epoch`.
async fn read_loop(
    inner: Weak<Inner>,
    epoch: u64,
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
) {
    loop {
        let event = events.recv().await.unwrap_or(TransportEvent::Closed {
            code: None,
            reason: "transport ended".into(),
        });

        let Some(inner) = inner.upgrade() else {
            return;
        };
        let manager = ChatManager { inner };
        if !manager.is_current(epoch) {
            return;
        }

        match event {
            TransportEvent::Message(text) => manager.dispatch(epoch, &text),
            TransportEvent::Error(reason) => warn!(%reason, "chat transport error"),
            TransportEvent::Closed { code, reason } => {
                manager.handle_disconnection(epoch, code, &reason);
                return;
            }
        }
    }
}
