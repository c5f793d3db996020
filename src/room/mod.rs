
use crate::client::ClientId;
use std::collections::BTreeMap;

/// Room every client is placed in on registration and returned to by `/leave`.
pub const DEFAULT_ROOM: &str = "general";

/// A named set of members, keyed by display name.
///
/// Rooms are created on first join and dropped by the registry as soon as
/// their membership becomes empty.
#[derive(Debug, Clone)]
pub struct Room {
    pub name: String,
    members: BTreeMap<String, ClientId>,
}

impl Room {
    pub fn new(name: String) -> Self {
        Room {
            name,
            members: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: String, id: ClientId) {
        self.members.insert(name, id);
    }

    pub fn remove(&mut self, name: &str) -> Option<ClientId> {
        self.members.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member ids in name order.
    pub fn member_ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.members.values().copied()
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.keys().map(String::as_str)
    }
}
