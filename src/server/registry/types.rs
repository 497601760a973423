use serde::{Serialize, Deserialize};
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

/// A participant identity. The id is an opaque client-supplied string and is
/// stable across reconnects.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// A room seat: the player plus their connection bookkeeping. Only the
/// registry mutates the connection fields.
#[derive(Debug, Clone)]
pub struct Member {
    pub player: Player,
    pub connection: ConnectionState,
    pub disconnected_at: Option<Instant>,
}

impl Member {
    pub fn new(player: Player) -> Self {
        Member {
            player,
            connection: ConnectionState::Connected,
            disconnected_at: None,
        }
    }
}

/// A two-player room. Holds at most two members; the host seat is reassigned
/// if the host leaves.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub host_id: String,
    pub members: Vec<Member>,
}

impl Room {
    pub fn players(&self) -> Vec<Player> {
        self.members.iter().map(|m| m.player.clone()).collect()
    }

    pub fn is_member(&self, player_id: &str) -> bool {
        self.members.iter().any(|m| m.player.id == player_id)
    }

    /// Client-facing summary. None for a room with no members left (such a
    /// room is being deleted).
    pub fn summary(&self, match_in_progress: bool) -> Option<RoomSummary> {
        let host = self
            .members
            .iter()
            .find(|m| m.player.id == self.host_id)
            .or_else(|| self.members.first())?;
        Some(RoomSummary {
            id: self.id,
            name: self.name.clone(),
            host: host.player.clone(),
            players: self.players(),
            match_in_progress,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: Uuid,
    pub name: String,
    pub host: Player,
    pub players: Vec<Player>,
    pub match_in_progress: bool,
}

/// Outcome of a successful leave operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveReport {
    pub room_closed: bool,
    pub host_reassigned: bool,
}

/// Everything that can go wrong at the room/match boundary. Messages are the
/// client-facing text carried by `room.error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Room name and host are required")]
    InvalidName,
    #[error("Player is already in a room")]
    AlreadyInRoom,
    #[error("Player is already in another room")]
    AlreadyInOtherRoom,
    #[error("Room not found")]
    RoomNotFound,
    #[error("Room is full")]
    RoomFull,
    #[error("Player not found in room")]
    PlayerNotInRoom,
    #[error("Not enough players")]
    InsufficientPlayers,
    #[error("Invalid choice. Must be \"bat\" or \"bowl\"")]
    InvalidChoice,
    #[error("Match already in progress")]
    MatchAlreadyStarted,
    #[error("No match in progress")]
    NoMatchInProgress,
}
