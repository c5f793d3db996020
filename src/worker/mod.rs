//! Per-connection task: name handshake, then forwarding input lines to the
//! dispatcher until the peer goes away.
mod test;

use crate::client::Outbox;
use crate::connection::{LineSink, LineStream};
use crate::dispatcher::DispatcherHandle;
use crate::error::ChatError;
use crate::response::{Notice, NAME_PROMPT};
use crate::writer;
use tracing::{debug, info, warn};

pub struct ConnectionWorker<S, W> {
    stream: S,
    sink: W,
    dispatcher: DispatcherHandle,
    outbox_capacity: usize,
    peer: String,
}

impl<S, W> ConnectionWorker<S, W>
where
    S: LineStream,
    W: LineSink + 'static,
{
    /// `peer` labels the connection in logs until a name is accepted.
    pub fn new(
        stream: S,
        sink: W,
        dispatcher: DispatcherHandle,
        outbox_capacity: usize,
        peer: impl Into<String>,
    ) -> Self {
        ConnectionWorker {
            stream,
            sink,
            dispatcher,
            outbox_capacity,
            peer: peer.into(),
        }
    }

    /// Runs the connection to completion.
    ///
    /// Returns an error only if the handshake fails, in which case the client
    /// was never registered. Once registered, end-of-stream and read errors
    /// both end the session normally: exactly one unregister is submitted and
    /// the connection is closed after the writer has drained.
    pub async fn run(self) -> Result<(), ChatError> {
        let ConnectionWorker {
            mut stream,
            mut sink,
            dispatcher,
            outbox_capacity,
            peer,
        } = self;

        if let Err(e) = sink.send_raw(NAME_PROMPT).await {
            let _ = sink.close().await;
            return Err(e);
        }
        let name = match stream.next_line().await {
            Ok(Some(line)) => line.trim().to_string(),
            Ok(None) => {
                debug!(peer = %peer, "connection closed before a name was sent");
                let _ = sink.close().await;
                return Err(ChatError::ConnectionClosed);
            }
            Err(e) => {
                warn!(peer = %peer, error = %e, "failed to read name");
                let _ = sink.close().await;
                return Err(e);
            }
        };
        if name.is_empty() {
            reject(&mut sink, Notice::NameEmpty).await;
            return Err(ChatError::NameEmpty);
        }

        let (outbox, outbox_rx) = Outbox::channel(outbox_capacity);
        let id = match dispatcher.register(name.clone(), outbox).await {
            Ok(id) => id,
            Err(ChatError::NameTaken(name)) => {
                reject(&mut sink, Notice::NameTaken(name.clone())).await;
                return Err(ChatError::NameTaken(name));
            }
            Err(e) => {
                let _ = sink.close().await;
                return Err(e);
            }
        };
        let writer = writer::spawn(sink, outbox_rx, name.clone());

        loop {
            match stream.next_line().await {
                Ok(Some(line)) => {
                    if dispatcher.submit(id, line.trim()).await.is_err() {
                        warn!(client = %name, "dispatcher stopped, dropping connection");
                        break;
                    }
                }
                Ok(None) => {
                    debug!(client = %name, "end of stream");
                    break;
                }
                Err(e) => {
                    info!(client = %name, error = %e, "read failed");
                    break;
                }
            }
        }

        let _ = dispatcher.unregister(id);
        drop(stream);
        if let Err(e) = writer.await {
            warn!(client = %name, error = %e, "writer task failed");
        }
        Ok(())
    }
}

async fn reject<W: LineSink>(sink: &mut W, notice: Notice) {
    info!(reason = %notice, "rejecting connection");
    if let Err(e) = sink.send_line(&notice.to_string()).await {
        debug!(error = %e, "failed to send rejection");
    }
    let _ = sink.close().await;
}
