// src/config/rooms.rs

/// Maximum number of players per room.
pub const MAX_ROOM_PLAYERS: usize = 2;

/// Grace period before an unreconnected player is evicted, outside a match.
pub const PRE_MATCH_GRACE_SECS: u64 = 30;

/// Grace period while a match is in progress.
pub const MID_MATCH_GRACE_SECS: u64 = 60;
