//! Wire protocol between clients and the server.
//!
//! Every frame is a JSON object tagged `{"action": ..., "data": ...}`.
//! Client events are routed by the session actor into the room registry;
//! server events are fanned out by the registry and match sessions.

use actix::prelude::*;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::game::state::MatchState;
use crate::game::types::{MatchAction, MatchResult};
use crate::server::registry::types::{Player, RoomSummary};

/// Client -> server events.
#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "action", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "player.register")]
    Register(Player),
    #[serde(rename = "rooms.list")]
    RoomsList,
    #[serde(rename = "room.create")]
    RoomCreate { name: String, host: Player },
    #[serde(rename = "room.join")]
    RoomJoin {
        #[serde(rename = "roomId")]
        room_id: Uuid,
        player: Player,
    },
    #[serde(rename = "toss.request")]
    TossRequest,
    #[serde(rename = "toss.choice")]
    TossChoice { choice: String },
    #[serde(rename = "match.action")]
    MatchAction(MatchAction),
    #[serde(rename = "ping")]
    Ping,
}

/// Server -> client events.
#[derive(Message, Serialize, Deserialize, Clone, Debug)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "rooms.list")]
    RoomsList(Vec<RoomSummary>),
    #[serde(rename = "room.created")]
    RoomCreated(RoomSummary),
    #[serde(rename = "room.joined")]
    RoomJoined(RoomSummary),
    #[serde(rename = "room.updated")]
    RoomUpdated(RoomSummary),
    #[serde(rename = "room.error")]
    RoomError { message: String },
    #[serde(rename = "toss.result")]
    TossResult { winner: Player },
    #[serde(rename = "toss.choiceResult")]
    TossChoiceResult {
        choice: String,
        #[serde(rename = "battingId")]
        batting_id: String,
        #[serde(rename = "bowlingId")]
        bowling_id: String,
    },
    #[serde(rename = "match.started")]
    MatchStarted(MatchState),
    #[serde(rename = "match.state")]
    MatchStateUpdate(MatchState),
    #[serde(rename = "match.over")]
    MatchOver(MatchResult),
    #[serde(rename = "player.left")]
    PlayerLeft {
        #[serde(rename = "playerId")]
        player_id: String,
        #[serde(rename = "roomClosed")]
        room_closed: bool,
    },
}

impl ServerEvent {
    pub fn error(err: impl std::fmt::Display) -> Self {
        ServerEvent::RoomError {
            message: err.to_string(),
        }
    }
}
