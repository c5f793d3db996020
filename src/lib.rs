//! Roomcast: a line-based multi-room chat server.
//!
//! Connection workers perform the name handshake and forward input lines;
//! a single dispatcher owns all chat state and routes every message.
pub mod client;
pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod registry;
pub mod response;
pub mod room;
pub mod server;
pub mod utils;
pub mod worker;
pub mod writer;

pub use config::ChatConfig;
pub use error::ChatError;
pub use server::tcp::TcpChatServer;
pub use server::ChatServer;
