//! Transport-independent chat server plus its TCP and in-process front ends.
pub mod mpsc;
pub mod tcp;

mod test;

use crate::config::ChatConfig;
use crate::connection::{LineSink, LineStream};
use crate::dispatcher::{Dispatcher, DispatcherHandle};
use crate::error::ChatError;
use crate::registry::RoomRegistry;
use crate::worker::ConnectionWorker;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Shared entry point for every transport: turns a connected
/// `LineStream`/`LineSink` pair into a connection worker.
#[derive(Debug, Clone)]
pub struct ChatServer {
    dispatcher: DispatcherHandle,
    outbox_capacity: usize,
}

impl ChatServer {
    /// Starts the dispatcher sized from `config`. The returned task yields the
    /// final registry once every clone of the server is dropped.
    pub fn start(config: &ChatConfig) -> (ChatServer, JoinHandle<RoomRegistry>) {
        let (dispatcher, task) = Dispatcher::spawn(config.message_queue_capacity);
        let server = ChatServer {
            dispatcher,
            outbox_capacity: config.outbox_capacity,
        };
        (server, task)
    }

    pub fn dispatcher(&self) -> &DispatcherHandle {
        &self.dispatcher
    }

    /// Serves one connection to completion.
    pub async fn handle_stream<S, W>(&self, stream: S, sink: W, peer: String)
    where
        S: LineStream,
        W: LineSink + 'static,
    {
        let worker = ConnectionWorker::new(
            stream,
            sink,
            self.dispatcher.clone(),
            self.outbox_capacity,
            peer.as_str(),
        );
        match worker.run().await {
            Ok(()) => debug!(peer = %peer, "connection finished"),
            Err(e @ (ChatError::NameEmpty | ChatError::NameTaken(_))) => {
                info!(peer = %peer, reason = %e, "handshake rejected")
            }
            Err(e) => debug!(peer = %peer, error = %e, "connection ended during handshake"),
        }
    }
}
