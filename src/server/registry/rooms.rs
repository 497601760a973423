//! Pure room bookkeeping: creation, membership, host reassignment, and
//! connection flags. No timers and no I/O; the registry actor wraps this
//! table and owns everything time- and network-related.
//!
//! Invariants enforced here: a player id appears in at most one room, a room
//! holds at most two members, and an empty room is deleted immediately.

use uuid::Uuid;

use crate::config::rooms::MAX_ROOM_PLAYERS;
use crate::server::registry::types::{
    ConnectionState, LeaveReport, Member, Player, RegistryError, Room,
};

/// All live rooms, in creation order.
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: Vec<Room>,
}

impl RoomTable {
    pub fn new() -> Self {
        RoomTable { rooms: Vec::new() }
    }

    /// Rooms in creation order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn get(&self, room_id: Uuid) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    fn get_mut(&mut self, room_id: Uuid) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.id == room_id)
    }

    /// The room a player currently occupies, if any.
    pub fn find_room_of(&self, player_id: &str) -> Option<Uuid> {
        self.rooms
            .iter()
            .find(|r| r.is_member(player_id))
            .map(|r| r.id)
    }

    /// Create a room with the host as its only member.
    pub fn create_room(&mut self, name: &str, host: Player) -> Result<&Room, RegistryError> {
        if name.trim().is_empty() || host.id.is_empty() {
            return Err(RegistryError::InvalidName);
        }
        if self.find_room_of(&host.id).is_some() {
            return Err(RegistryError::AlreadyInRoom);
        }
        let room = Room {
            id: Uuid::new_v4(),
            name: name.to_string(),
            host_id: host.id.clone(),
            members: vec![Member::new(host)],
        };
        self.rooms.push(room);
        Ok(self.rooms.last().expect("room was just pushed"))
    }

    /// Add a player to a room. Re-joining the same room is an idempotent
    /// no-op that returns the room unchanged.
    pub fn join_room(&mut self, room_id: Uuid, player: Player) -> Result<&Room, RegistryError> {
        let idx = self
            .rooms
            .iter()
            .position(|r| r.id == room_id)
            .ok_or(RegistryError::RoomNotFound)?;

        if let Some(existing) = self.find_room_of(&player.id) {
            if existing != room_id {
                return Err(RegistryError::AlreadyInOtherRoom);
            }
            return Ok(&self.rooms[idx]);
        }
        if self.rooms[idx].members.len() >= MAX_ROOM_PLAYERS {
            return Err(RegistryError::RoomFull);
        }
        self.rooms[idx].members.push(Member::new(player));
        Ok(&self.rooms[idx])
    }

    /// Remove a member. Deletes the room when it empties and reassigns the
    /// host seat when the host leaves. None when room or member is absent.
    pub fn leave_room(&mut self, room_id: Uuid, player_id: &str) -> Option<LeaveReport> {
        let idx = self.rooms.iter().position(|r| r.id == room_id)?;
        let room = &mut self.rooms[idx];
        let before = room.members.len();
        room.members.retain(|m| m.player.id != player_id);
        if room.members.len() == before {
            return None;
        }

        if room.members.is_empty() {
            self.rooms.remove(idx);
            return Some(LeaveReport {
                room_closed: true,
                host_reassigned: false,
            });
        }

        let mut host_reassigned = false;
        if room.host_id == player_id {
            room.host_id = room.members[0].player.id.clone();
            host_reassigned = true;
        }
        Some(LeaveReport {
            room_closed: false,
            host_reassigned,
        })
    }

    /// Flag a member as disconnected without removing them. Returns the room
    /// they occupy so the caller can arm a grace timer.
    pub fn mark_disconnected(&mut self, player_id: &str, at: std::time::Instant) -> Option<Uuid> {
        let room_id = self.find_room_of(player_id)?;
        let room = self.get_mut(room_id)?;
        let member = room.members.iter_mut().find(|m| m.player.id == player_id)?;
        member.connection = ConnectionState::Disconnected;
        member.disconnected_at = Some(at);
        Some(room_id)
    }

    /// Flag a member as reconnected. Returns their room if they had a seat.
    pub fn mark_reconnected(&mut self, player_id: &str) -> Option<Uuid> {
        let room_id = self.find_room_of(player_id)?;
        let room = self.get_mut(room_id)?;
        let member = room.members.iter_mut().find(|m| m.player.id == player_id)?;
        member.connection = ConnectionState::Connected;
        member.disconnected_at = None;
        Some(room_id)
    }

    /// Eviction predicate for the grace timer: the callback fires and checks,
    /// and a member who reconnected in the meantime must not be evicted.
    pub fn is_connected(&self, player_id: &str) -> bool {
        self.rooms.iter().any(|r| {
            r.members
                .iter()
                .any(|m| m.player.id == player_id && m.connection == ConnectionState::Connected)
        })
    }
}
