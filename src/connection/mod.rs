//! Transport seams between a socket and the chat core.
//!
//! A connection is split into a `LineStream` read by its worker and a
//! `LineSink` written first by the worker during the handshake and then
//! exclusively by the client's writer task.

#[cfg(test)]
pub(crate) mod mock;

use crate::error::ChatError;
use async_trait::async_trait;

#[async_trait]
pub trait LineSink: Send {
    /// Writes `text` exactly as given.
    async fn send_raw(&mut self, text: &str) -> Result<(), ChatError>;

    /// Writes `line` followed by a newline.
    async fn send_line(&mut self, line: &str) -> Result<(), ChatError> {
        let mut framed = String::with_capacity(line.len() + 1);
        framed.push_str(line);
        framed.push('\n');
        self.send_raw(&framed).await
    }

    /// Flushes and shuts down the write side of the connection.
    async fn close(&mut self) -> Result<(), ChatError>;
}

#[async_trait]
pub trait LineStream: Send {
    /// Reads one line without its terminator. `Ok(None)` is end-of-stream.
    async fn next_line(&mut self) -> Result<Option<String>, ChatError>;
}
