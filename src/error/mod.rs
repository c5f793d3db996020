use thiserror::Error;

/// Errors produced by the chat core and its transports.
///
/// Handshake failures (`NameEmpty`, `NameTaken`) end a connection before it is
/// ever registered. Delivery failures (`OutboxFull`, `OutboxClosed`, and `Io`
/// on a write) are logged at the point of delivery and never reach the sender.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("name cannot be empty")]
    NameEmpty,
    #[error("name '{0}' is already taken")]
    NameTaken(String),
    #[error("dispatcher is no longer running")]
    DispatcherClosed,
    #[error("outbound queue for '{0}' is full")]
    OutboxFull(String),
    #[error("outbound queue for '{0}' is closed")]
    OutboxClosed(String),
    #[error("connection closed")]
    ConnectionClosed,
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;
