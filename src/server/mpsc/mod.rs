//! Provides an in-process front end backed by Tokio MPSC channels.
//!
//! Useful for embedding the chat core or for tests that do not want a socket.
//! Each received `String` is one server line without its terminator, except the
//! name prompt, which arrives exactly as written.

use crate::connection::{LineSink, LineStream};
use crate::error::ChatError;
use crate::server::ChatServer;
use crate::utils::get_id;
use async_trait::async_trait;
use tokio::sync::mpsc::{self, Receiver, Sender};

/// A [`LineSink`] that forwards every line into a channel.
#[derive(Clone)]
pub struct MpscSink {
    sender: Sender<String>,
}

#[async_trait]
impl LineSink for MpscSink {
    async fn send_raw(&mut self, text: &str) -> Result<(), ChatError> {
        self.sender
            .send(text.to_string())
            .await
            .map_err(|_| ChatError::ConnectionClosed)
    }

    async fn send_line(&mut self, line: &str) -> Result<(), ChatError> {
        self.send_raw(line).await
    }

    async fn close(&mut self) -> Result<(), ChatError> {
        Ok(())
    }
}

/// A [`LineStream`] fed by a channel. A dropped sender is end-of-stream.
pub struct MpscStream {
    receiver: Receiver<String>,
}

#[async_trait]
impl LineStream for MpscStream {
    async fn next_line(&mut self) -> Result<Option<String>, ChatError> {
        Ok(self.receiver.recv().await)
    }
}

pub struct MpscChatServer {
    server: ChatServer,
}

impl MpscChatServer {
    pub fn new(server: ChatServer) -> Self {
        MpscChatServer { server }
    }

    /// Opens an in-process connection.
    ///
    /// Returns the sender for client lines and the receiver for server lines.
    /// Dropping the sender disconnects; the receiver closes once the
    /// connection is fully torn down.
    pub fn connect(&self, buffer_size: usize) -> (Sender<String>, Receiver<String>) {
        let (line_tx, line_rx) = mpsc::channel(buffer_size.max(1));
        let (out_tx, out_rx) = mpsc::channel(buffer_size.max(1));

        let server = self.server.clone();
        let peer = format!("mpsc-{}", get_id());
        tokio::spawn(async move {
            let stream = MpscStream { receiver: line_rx };
            let sink = MpscSink { sender: out_tx };
            server.handle_stream(stream, sink, peer).await;
        });

        (line_tx, out_rx)
    }
}
