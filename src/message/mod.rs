
use crate::client::{ClientId, Outbox};
use crate::error::ChatError;
use tokio::sync::oneshot;

const WHISPER_PREFIX: &str = "/whisper ";
const JOIN_PREFIX: &str = "/join ";
const LEAVE_COMMAND: &str = "/leave";

/// Name reservation request. The dispatcher answers on `respond_to` with the
/// new client's id, or `NameTaken` if the name is in use.
#[derive(Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub outbox: Outbox,
    pub respond_to: oneshot::Sender<Result<ClientId, ChatError>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnregisterRequest {
    pub client: ClientId,
}

/// One trimmed input line from a registered client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub client: ClientId,
    pub text: String,
}

impl ChatMessage {
    pub fn new(client: ClientId, text: impl Into<String>) -> Self {
        ChatMessage {
            client,
            text: text.into(),
        }
    }
}

/// Interpretation of one chat line, checked in this order:
/// `/whisper `, `/join `, exact `/leave`, anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/whisper <target> <text>`
    Whisper { target: String, text: String },
    /// `/whisper ` with fewer than three space-separated parts.
    WhisperUsage,
    /// `/join <room>`, room trimmed. May be empty.
    Join(String),
    Leave,
    /// Plain chat line for the current room.
    Say(String),
}

impl Command {
    pub fn parse(text: &str) -> Command {
        if text.starts_with(WHISPER_PREFIX) {
            let mut parts = text.splitn(3, ' ');
            let _command = parts.next();
            return match (parts.next(), parts.next()) {
                (Some(target), Some(rest)) => Command::Whisper {
                    target: target.to_string(),
                    text: rest.to_string(),
                },
                _ => Command::WhisperUsage,
            };
        }
        if let Some(room) = text.strip_prefix(JOIN_PREFIX) {
            return Command::Join(room.trim().to_string());
        }
        if text == LEAVE_COMMAND {
            return Command::Leave;
        }
        Command::Say(text.to_string())
    }
}
