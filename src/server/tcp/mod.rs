//! TCP front end: newline-delimited UTF-8 over a `TcpStream`.

use crate::connection::{LineSink, LineStream};
use crate::error::ChatError;
use crate::server::ChatServer;
use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tracing::{error, info};

pub struct TcpLineStream {
    lines: Lines<BufReader<OwnedReadHalf>>,
}

#[async_trait]
impl LineStream for TcpLineStream {
    async fn next_line(&mut self) -> Result<Option<String>, ChatError> {
        let line = self.lines.next_line().await?;
        // Tolerate CRLF clients.
        Ok(line.map(|mut line| {
            if line.ends_with('\r') {
                line.pop();
            }
            line
        }))
    }
}

pub struct TcpLineSink {
    writer: OwnedWriteHalf,
}

#[async_trait]
impl LineSink for TcpLineSink {
    async fn send_raw(&mut self, text: &str) -> Result<(), ChatError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ChatError> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

/// Splits a socket into the line adapters used by the connection worker.
pub fn split(stream: TcpStream) -> (TcpLineStream, TcpLineSink) {
    let (read, write) = stream.into_split();
    (
        TcpLineStream {
            lines: BufReader::new(read).lines(),
        },
        TcpLineSink { writer: write },
    )
}

/// Accepts TCP connections and hands each one to its own worker task.
pub struct TcpChatServer {
    server: ChatServer,
    tcp_listener: Option<TcpListener>,
}

impl TcpChatServer {
    pub fn new(server: ChatServer) -> Self {
        TcpChatServer {
            server,
            tcp_listener: None,
        }
    }

    pub fn bind_listener(&mut self, listener: TcpListener) {
        self.tcp_listener = Some(listener);
    }

    pub async fn bind_addr<A: ToSocketAddrs>(&mut self, addr: A) -> io::Result<()> {
        let tcp_listener = TcpListener::bind(addr).await?;
        self.tcp_listener = Some(tcp_listener);
        Ok(())
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        match &self.tcp_listener {
            Some(listener) => listener.local_addr(),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "no listener bound",
            )),
        }
    }

    /// Runs the accept loop forever. Accept errors are logged and skipped.
    pub async fn listen(&self) -> Result<(), ChatError> {
        let listener = self.tcp_listener.as_ref().ok_or_else(|| {
            ChatError::Io(io::Error::new(io::ErrorKind::NotConnected, "no listener bound"))
        })?;
        info!(addr = %listener.local_addr()?, "chat server listening");

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    info!(peer = %addr, "accepted connection");
                    let server = self.server.clone();
                    tokio::spawn(async move {
                        let (lines, sink) = split(stream);
                        server.handle_stream(lines, sink, addr.to_string()).await;
                        info!(peer = %addr, "connection closed");
                    });
                }
                Err(e) => {
                    error!(error = %e, "error accepting connection");
                }
            }
        }
    }
}
