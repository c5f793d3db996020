
use crate::error::ChatError;
use crate::room::DEFAULT_ROOM;
use tokio::sync::mpsc::{self, error::TrySendError, Receiver, Sender};

/// Stable handle of a registered connection.
pub type ClientId = u64;

/// Sending half of a client's bounded outbound line queue.
///
/// The matching receiver is drained by the client's writer task, which is the
/// only writer to the socket once the client is registered.
#[derive(Debug, Clone)]
pub struct Outbox {
    sender: Sender<String>,
}

impl Outbox {
    /// Creates an outbox and the receiver its writer task drains.
    pub fn channel(capacity: usize) -> (Outbox, Receiver<String>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Outbox { sender }, receiver)
    }

    /// Enqueues one line without waiting for room in the queue.
    pub fn try_push(&self, line: String) -> Result<(), TrySendError<String>> {
        self.sender.try_send(line)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// A registered chat participant.
///
/// Each client has a unique id, an immutable display name, the name of the
/// room it currently sits in, and its outbox.
#[derive(Debug)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub room: String,
    outbox: Outbox,
}

impl Client {
    /// Creates a client placed in the default room.
    pub fn new(id: ClientId, name: String, outbox: Outbox) -> Self {
        Client {
            id,
            name,
            room: DEFAULT_ROOM.to_string(),
            outbox,
        }
    }

    /// Queues one line for this client. Never waits on the peer.
    pub fn deliver(&self, line: impl Into<String>) -> Result<(), ChatError> {
        self.outbox.try_push(line.into()).map_err(|e| match e {
            TrySendError::Full(_) => ChatError::OutboxFull(self.name.clone()),
            TrySendError::Closed(_) => ChatError::OutboxClosed(self.name.clone()),
        })
    }
}
