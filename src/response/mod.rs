
use std::fmt;

/// Prompt written before the first client line is read. Not newline-terminated.
pub const NAME_PROMPT: &str = "Enter your name: ";

const WHISPER_USAGE: &str = "Usage: /whisper <username> <message>";
const SELF_WHISPER: &str = "You cannot whisper to yourself.";
const ROOM_NAME_EMPTY: &str = "Room name cannot be empty.";
const NAME_EMPTY: &str = "Name cannot be empty. Disconnecting.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Handshake rejected: empty name.
    NameEmpty,
    /// Handshake rejected: name already registered.
    NameTaken(String),
    /// Broadcast to the default room after registration.
    JoinedChat(String),
    /// Broadcast to the client's last room after disconnect.
    LeftChat(String),
    /// `"<name>: <text>"` chat line.
    Chat { from: String, text: String },
    WhisperFrom { from: String, text: String },
    WhisperTo { to: String, text: String },
    WhisperUsage,
    SelfWhisper,
    UserNotFound(String),
    RoomNameEmpty,
    AlreadyInRoom(String),
    /// Confirmation sent to the client that moved.
    RoomJoined(String),
    /// Broadcast to the room a client moved into.
    MemberJoinedRoom(String),
    /// Broadcast to the room a client moved out of.
    MemberLeftRoom(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NameEmpty => f.write_str(NAME_EMPTY),
            Notice::NameTaken(name) => write!(
                f,
                "Name '{}' is already taken. Please choose another. Disconnecting.",
                name
            ),
            Notice::JoinedChat(name) => write!(f, "{} has joined the chat.", name),
            Notice::LeftChat(name) => write!(f, "{} has left the chat.", name),
            Notice::Chat { from, text } => write!(f, "{}: {}", from, text),
            Notice::WhisperFrom { from, text } => write!(f, "[Whisper from {}]: {}", from, text),
            Notice::WhisperTo { to, text } => write!(f, "[Whisper to {}]: {}", to, text),
            Notice::WhisperUsage => f.write_str(WHISPER_USAGE),
            Notice::SelfWhisper => f.write_str(SELF_WHISPER),
            Notice::UserNotFound(name) => write!(f, "User '{}' not found.", name),
            Notice::RoomNameEmpty => f.write_str(ROOM_NAME_EMPTY),
            Notice::AlreadyInRoom(room) => write!(f, "You are already in room '{}'.", room),
            Notice::RoomJoined(room) => write!(f, "You have joined room '{}'.", room),
            Notice::MemberJoinedRoom(name) => write!(f, "{} has joined the room.", name),
            Notice::MemberLeftRoom(name) => write!(f, "{} has left the room.", name),
        }
    }
}

impl From<Notice> for String {
    fn from(notice: Notice) -> Self {
        notice.to_string()
    }
}
