//! The dispatcher: sole owner of the `RoomRegistry`.
//!
//! Workers never touch chat state. They submit requests through a
//! `DispatcherHandle` onto three queues (register, message, unregister) and the
//! dispatcher applies each request to completion, including queuing every line
//! it produces, before it looks at the next one. Outbound lines go to per-client
//! outboxes with `try_send`, so a slow peer never stalls the loop.

use crate::client::{Client, ClientId, Outbox};
use crate::error::ChatError;
use crate::message::{ChatMessage, Command, RegisterRequest, UnregisterRequest};
use crate::registry::RoomRegistry;
use crate::response::Notice;
use crate::room::DEFAULT_ROOM;
use crate::utils::get_id;
use tokio::sync::mpsc::{self, Receiver, Sender, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Cloneable submission side of the dispatcher queues.
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    register_tx: Sender<RegisterRequest>,
    message_tx: Sender<ChatMessage>,
    unregister_tx: UnboundedSender<UnregisterRequest>,
}

/// Receiving side of the dispatcher queues, consumed by `Dispatcher::run`.
#[derive(Debug)]
pub struct Inbox {
    register_rx: Receiver<RegisterRequest>,
    message_rx: Receiver<ChatMessage>,
    unregister_rx: UnboundedReceiver<UnregisterRequest>,
}

/// Creates the three request queues. Register and message queues hold up to
/// `capacity` pending requests; the unregister queue is unbounded so cleanup
/// can always be submitted.
pub fn channel(capacity: usize) -> (DispatcherHandle, Inbox) {
    let (register_tx, register_rx) = mpsc::channel(capacity.max(1));
    let (message_tx, message_rx) = mpsc::channel(capacity.max(1));
    let (unregister_tx, unregister_rx) = mpsc::unbounded_channel();
    (
        DispatcherHandle {
            register_tx,
            message_tx,
            unregister_tx,
        },
        Inbox {
            register_rx,
            message_rx,
            unregister_rx,
        },
    )
}

impl DispatcherHandle {
    /// Reserves `name` and registers the client. Resolves once the dispatcher
    /// has decided; on success the join notice is already queued.
    pub async fn register(&self, name: String, outbox: Outbox) -> Result<ClientId, ChatError> {
        let (respond_to, response) = oneshot::channel();
        self.register_tx
            .send(RegisterRequest {
                name,
                outbox,
                respond_to,
            })
            .await
            .map_err(|_| ChatError::DispatcherClosed)?;
        response.await.map_err(|_| ChatError::DispatcherClosed)?
    }

    pub async fn submit(&self, client: ClientId, text: impl Into<String>) -> Result<(), ChatError> {
        self.message_tx
            .send(ChatMessage::new(client, text))
            .await
            .map_err(|_| ChatError::DispatcherClosed)
    }

    pub fn unregister(&self, client: ClientId) -> Result<(), ChatError> {
        self.unregister_tx
            .send(UnregisterRequest { client })
            .map_err(|_| ChatError::DispatcherClosed)
    }
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: RoomRegistry,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a dispatcher task. The task ends once every handle is dropped
    /// and yields the final registry.
    pub fn spawn(capacity: usize) -> (DispatcherHandle, JoinHandle<RoomRegistry>) {
        let (handle, inbox) = channel(capacity);
        let task = tokio::spawn(Dispatcher::new().run(inbox));
        (handle, task)
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Processes requests one at a time until all queues are closed.
    ///
    /// Polling is biased register, message, unregister. A worker enqueues its
    /// messages before its unregister, so its pending messages are always
    /// applied before its removal.
    pub async fn run(mut self, mut inbox: Inbox) -> RoomRegistry {
        loop {
            tokio::select! {
                biased;
                Some(request) = inbox.register_rx.recv() => {
                    let RegisterRequest { name, outbox, respond_to } = request;
                    self.handle_register(name, outbox, respond_to);
                }
                Some(message) = inbox.message_rx.recv() => self.handle_message(message),
                Some(request) = inbox.unregister_rx.recv() => self.handle_unregister(request.client),
                else => break,
            }
        }
        debug!(clients = self.registry.client_count(), "dispatcher stopped");
        self.registry
    }

    fn handle_register(
        &mut self,
        name: String,
        outbox: Outbox,
        respond_to: oneshot::Sender<Result<ClientId, ChatError>>,
    ) {
        match self.register(name, outbox) {
            Ok(id) => {
                if respond_to.send(Ok(id)).is_err() {
                    debug!(client = id, "registrant went away before reply, unregistering");
                    self.handle_unregister(id);
                }
            }
            Err(e) => {
                let _ = respond_to.send(Err(e));
            }
        }
    }

    /// Adds a client under `name` in the default room and announces it there.
    pub fn register(&mut self, name: String, outbox: Outbox) -> Result<ClientId, ChatError> {
        if name.is_empty() {
            return Err(ChatError::NameEmpty);
        }
        if self.registry.contains_name(&name) {
            warn!(client = %name, "rejected registration, name already taken");
            return Err(ChatError::NameTaken(name));
        }

        let id = get_id();
        let client = Client::new(id, name.clone(), outbox);
        let room = client.room.clone();
        self.registry.insert(client)?;
        self.broadcast(&room, Notice::JoinedChat(name.clone()));

        info!(
            client = %name,
            room = %room,
            total = self.registry.client_count(),
            "client connected"
        );
        Ok(id)
    }

    /// Removes a client, which closes its outbox and with it the connection,
    /// then announces the departure to whoever is left in its room.
    /// Unknown ids are ignored.
    pub fn handle_unregister(&mut self, id: ClientId) {
        let Some(client) = self.registry.remove(id) else {
            debug!(client = id, "unregister for client that is not registered");
            return;
        };
        let name = client.name.clone();
        let room = client.room.clone();
        self.broadcast(&room, Notice::LeftChat(name.clone()));
        drop(client);
        info!(
            client = %name,
            room = %room,
            total = self.registry.client_count(),
            "client disconnected"
        );
    }

    pub fn handle_message(&mut self, message: ChatMessage) {
        let ChatMessage { client: id, text } = message;
        let Some(sender) = self.registry.client(id) else {
            debug!(client = id, "message from client that is not registered");
            return;
        };
        let (name, room) = (sender.name.clone(), sender.room.clone());

        match Command::parse(&text) {
            Command::Whisper { target, text } => self.send_whisper(id, &target, text),
            Command::WhisperUsage => self.reply(id, Notice::WhisperUsage),
            Command::Join(room) => self.join_room(id, &room),
            Command::Leave => self.join_room(id, DEFAULT_ROOM),
            Command::Say(text) => self.broadcast(&room, Notice::Chat { from: name, text }),
        }
    }

    fn send_whisper(&self, id: ClientId, target: &str, text: String) {
        let Some(sender) = self.registry.client(id) else {
            return;
        };
        if sender.name == target {
            self.reply(id, Notice::SelfWhisper);
            return;
        }
        let Some(recipient) = self.registry.client_by_name(target) else {
            self.reply(id, Notice::UserNotFound(target.to_string()));
            return;
        };

        deliver(
            recipient,
            Notice::WhisperFrom {
                from: sender.name.clone(),
                text: text.clone(),
            },
        );
        deliver(
            sender,
            Notice::WhisperTo {
                to: target.to_string(),
                text,
            },
        );
    }

    fn join_room(&mut self, id: ClientId, room: &str) {
        let Some(client) = self.registry.client(id) else {
            return;
        };
        if room.is_empty() {
            self.reply(id, Notice::RoomNameEmpty);
            return;
        }
        if client.room == room {
            self.reply(id, Notice::AlreadyInRoom(room.to_string()));
            return;
        }

        let name = client.name.clone();
        let Some(old_room) = self.registry.move_client(id, room) else {
            return;
        };
        self.broadcast(&old_room, Notice::MemberLeftRoom(name.clone()));
        self.reply(id, Notice::RoomJoined(room.to_string()));
        self.broadcast(room, Notice::MemberJoinedRoom(name.clone()));

        info!(client = %name, from = %old_room, to = %room, "client changed room");
    }

    fn reply(&self, id: ClientId, notice: Notice) {
        if let Some(client) = self.registry.client(id) {
            deliver(client, notice);
        }
    }

    /// Queues `notice` for every current member of `room`. A failed delivery
    /// is logged and skipped.
    fn broadcast(&self, room: &str, notice: Notice) {
        let line = notice.to_string();
        for member in self.registry.members(room) {
            deliver(member, line.as_str());
        }
    }
}

fn deliver(client: &Client, line: impl Into<String>) {
    if let Err(e) = client.deliver(line) {
        warn!(client = %client.name, error = %e, "failed to deliver line");
    }
}
