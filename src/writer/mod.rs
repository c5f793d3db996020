
use crate::connection::LineSink;
use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Drains a client's outbox into its sink until the outbox is closed, then
/// shuts the sink down.
///
/// The outbox closes when the dispatcher drops the client on unregister, so
/// everything queued before removal is still written. A failed write ends the
/// task early; later deliveries then see a closed outbox.
pub async fn run<S: LineSink>(mut sink: S, mut outbox: Receiver<String>, name: String) {
    while let Some(line) = outbox.recv().await {
        if let Err(e) = sink.send_line(&line).await {
            warn!(client = %name, error = %e, "write failed, dropping connection output");
            break;
        }
    }
    outbox.close();
    if let Err(e) = sink.close().await {
        debug!(client = %name, error = %e, "error while closing connection");
    }
    debug!(client = %name, "writer finished");
}

pub fn spawn<S: LineSink + 'static>(
    sink: S,
    outbox: Receiver<String>,
    name: String,
) -> JoinHandle<()> {
    tokio::spawn(run(sink, outbox, name))
}
