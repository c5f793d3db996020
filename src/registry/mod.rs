
use crate::client::{Client, ClientId};
use crate::error::ChatError;
use crate::room::Room;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct RoomRegistry {
    clients: HashMap<ClientId, Client>,
    names: HashMap<String, ClientId>,
    rooms: HashMap<String, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Registers a client in all three views under its current room.
    ///
    /// Fails without touching any view if the name is already registered.
    pub fn insert(&mut self, client: Client) -> Result<(), ChatError> {
        if self.names.contains_key(&client.name) {
            return Err(ChatError::NameTaken(client.name));
        }
        self.rooms
            .entry(client.room.clone())
            .or_insert_with(|| Room::new(client.room.clone()))
            .insert(client.name.clone(), client.id);
        self.names.insert(client.name.clone(), client.id);
        self.clients.insert(client.id, client);
        Ok(())
    }

    /// Removes a client from all three views, dropping its room if it is left
    /// empty. Returns `None` if the client is not registered.
    pub fn remove(&mut self, id: ClientId) -> Option<Client> {
        let client = self.clients.remove(&id)?;
        self.names.remove(&client.name);
        self.leave_room(&client.room, &client.name);
        Some(client)
    }

    /// Moves a registered client into `room`, creating it if absent and
    /// dropping the old room if it becomes empty.
    ///
    /// Returns the name of the room the client left, or `None` if the client
    /// is not registered.
    pub fn move_client(&mut self, id: ClientId, room: &str) -> Option<String> {
        let client = self.clients.get_mut(&id)?;
        let old_room = std::mem::replace(&mut client.room, room.to_string());
        let name = client.name.clone();

        self.leave_room(&old_room, &name);
        self.rooms
            .entry(room.to_string())
            .or_insert_with(|| Room::new(room.to_string()))
            .insert(name, id);
        Some(old_room)
    }

    fn leave_room(&mut self, room: &str, name: &str) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(name);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn client_by_name(&self, name: &str) -> Option<&Client> {
        self.names.get(name).and_then(|id| self.clients.get(id))
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    /// Current members of `room`. Empty if the room does not exist.
    pub fn members<'a>(&'a self, room: &str) -> impl Iterator<Item = &'a Client> + 'a {
        self.rooms
            .get(room)
            .into_iter()
            .flat_map(|room| room.member_ids())
            .filter_map(move |id| self.clients.get(&id))
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rooms.keys().map(String::as_str)
    }

    /// Verifies that the three views agree with each other.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.names.len() != self.clients.len() {
            return Err(format!(
                "{} names registered for {} clients",
                self.names.len(),
                self.clients.len()
            ));
        }
        for (name, id) in &self.names {
            match self.clients.get(id) {
                Some(client) if &client.name == name => {}
                _ => return Err(format!("name '{}' points at no matching client", name)),
            }
        }
        for client in self.clients.values() {
            let holders: Vec<&str> = self
                .rooms
                .values()
                .filter(|room| room.contains(&client.name))
                .map(|room| room.name.as_str())
                .collect();
            if holders != [client.room.as_str()] {
                return Err(format!(
                    "'{}' is in rooms {:?} but records room '{}'",
                    client.name, holders, client.room
                ));
            }
        }
        for (key, room) in &self.rooms {
            if room.is_empty() {
                return Err(format!("room '{}' is empty but still listed", key));
            }
            if key != &room.name {
                return Err(format!("room '{}' is stored under '{}'", room.name, key));
            }
            if room.len() > self.clients.len() {
                return Err(format!("room '{}' lists unregistered members", key));
            }
        }
        Ok(())
    }
}
