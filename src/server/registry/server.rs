/// Room registry actor.
///
/// Single serialized owner of all registry state: registered sessions, the
/// room table, per-room match session handles, and disconnect grace timers.
/// Handles room create/join/leave, toss flow, routing of match actions, and
/// broadcast fan-out to clients.

use actix::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;
use log::{info, debug, warn};

use crate::config::rooms::{PRE_MATCH_GRACE_SECS, MID_MATCH_GRACE_SECS};
use crate::game::state::{perform_toss, apply_toss_choice};
use crate::game::stats::MatchRecorder;
use crate::game::types::{MatchAction, MatchResult, TossChoice};
use crate::server::events::ServerEvent;
use crate::server::match_session::messages::{RehomeSession, Shutdown, SubmitIntent};
use crate::server::match_session::MatchSession;
use crate::server::session::ClientSession;
use super::rooms::RoomTable;
use super::types::{Player, RegistryError, RoomSummary};

type SessionAddr = Addr<ClientSession>;

/// Message: a session announced its identity (fresh connection or reconnect).
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub player: Player,
    pub addr: SessionAddr,
}

/// Message: a session's transport closed.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub player_id: String,
    pub addr: SessionAddr,
}

/// Message: a session asked for the room list.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ListRooms {
    pub addr: SessionAddr,
}

/// Message: create a room with the sender as host.
#[derive(Message)]
#[rtype(result = "()")]
pub struct CreateRoom {
    pub name: String,
    pub host: Player,
    pub addr: SessionAddr,
}

/// Message: join an existing room.
#[derive(Message)]
#[rtype(result = "()")]
pub struct JoinRoom {
    pub room_id: Uuid,
    pub player: Player,
    pub addr: SessionAddr,
}

/// Message: perform the coin toss in the sender's room.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RequestToss {
    pub player_id: String,
}

/// Message: the toss winner chose to bat or bowl.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ChooseToss {
    pub player_id: String,
    pub choice: String,
}

/// Message: a bowl or bat intent for the sender's live match.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SubmitMatchAction {
    pub player_id: String,
    pub action: MatchAction,
}

/// Message: a match session finished its match.
#[derive(Message)]
#[rtype(result = "()")]
pub struct MatchCompleted {
    pub room_id: Uuid,
    pub result: MatchResult,
}

/// Main registry actor.
pub struct RoomRegistry {
    /// Sessions of registered players, by player id.
    sessions: HashMap<String, SessionAddr>,
    /// Pure room/membership bookkeeping.
    table: RoomTable,
    /// Live match session per room. Present iff a match is in progress.
    matches: HashMap<Uuid, Addr<MatchSession>>,
    /// Pending disconnect grace timers, keyed by (room, player).
    expiry_timers: HashMap<(Uuid, String), SpawnHandle>,
    /// Stats collaborator handed to each match session.
    recorder: Arc<dyn MatchRecorder>,
}

impl RoomRegistry {
    pub fn new(recorder: Arc<dyn MatchRecorder>) -> Self {
        Self {
            sessions: HashMap::new(),
            table: RoomTable::new(),
            matches: HashMap::new(),
            expiry_timers: HashMap::new(),
            recorder,
        }
    }

    fn room_summaries(&self) -> Vec<RoomSummary> {
        self.table
            .rooms()
            .iter()
            .filter_map(|r| r.summary(self.matches.contains_key(&r.id)))
            .collect()
    }

    /// Send the current room list to every registered session.
    fn broadcast_rooms_list(&self) {
        let event = ServerEvent::RoomsList(self.room_summaries());
        for addr in self.sessions.values() {
            addr.do_send(event.clone());
        }
    }

    /// Send an event to every member of a room that still has a live session.
    fn broadcast_to_room(&self, room_id: Uuid, event: &ServerEvent) {
        if let Some(room) = self.table.get(room_id) {
            for member in &room.members {
                if let Some(addr) = self.sessions.get(&member.player.id) {
                    addr.do_send(event.clone());
                }
            }
        }
    }

    fn send_to(&self, player_id: &str, event: ServerEvent) {
        if let Some(addr) = self.sessions.get(player_id) {
            addr.do_send(event);
        }
    }

    fn cancel_expiry_timer(&mut self, room_id: Uuid, player_id: &str, ctx: &mut Context<Self>) {
        if let Some(handle) = self.expiry_timers.remove(&(room_id, player_id.to_string())) {
            ctx.cancel_future(handle);
            debug!("[Registry] Cancelled disconnect timer for player {}", player_id);
        }
    }

    fn cancel_room_timers(&mut self, room_id: Uuid, ctx: &mut Context<Self>) {
        let keys: Vec<(Uuid, String)> = self
            .expiry_timers
            .keys()
            .filter(|(rid, _)| *rid == room_id)
            .cloned()
            .collect();
        for key in keys {
            if let Some(handle) = self.expiry_timers.remove(&key) {
                ctx.cancel_future(handle);
            }
        }
    }

    /// Grace timer callback. Fire-and-check: a player who reconnected while
    /// the timer was pending keeps their seat.
    fn expire_disconnect(&mut self, room_id: Uuid, player_id: String, ctx: &mut Context<Self>) {
        self.expiry_timers.remove(&(room_id, player_id.clone()));
        if self.table.is_connected(&player_id) {
            debug!(
                "[Registry] Grace timer fired for player {} but they reconnected; keeping seat",
                player_id
            );
            return;
        }
        info!(
            "[Registry] Player {} did not reconnect in time, removing from room {}",
            player_id, room_id
        );
        self.remove_from_room(room_id, &player_id, ctx);
    }

    /// Take a player out of a room, tearing down the room and its match when
    /// the membership can no longer sustain them.
    fn remove_from_room(&mut self, room_id: Uuid, player_id: &str, ctx: &mut Context<Self>) {
        let Some(report) = self.table.leave_room(room_id, player_id) else {
            return;
        };
        self.cancel_expiry_timer(room_id, player_id, ctx);

        if report.room_closed {
            self.cancel_room_timers(room_id, ctx);
        }
        // A two-player match cannot continue with an empty seat.
        if let Some(match_addr) = self.matches.remove(&room_id) {
            match_addr.do_send(Shutdown);
            info!("[Registry] Match in room {} abandoned after player {} left", room_id, player_id);
        }

        let event = ServerEvent::PlayerLeft {
            player_id: player_id.to_string(),
            room_closed: report.room_closed,
        };
        self.broadcast_to_room(room_id, &event);
        self.broadcast_rooms_list();
        info!(
            "[Registry] Player {} left room {} (closed={})",
            player_id, room_id, report.room_closed
        );
    }
}

impl Actor for RoomRegistry {
    type Context = Context<Self>;
}

impl Handler<Connect> for RoomRegistry {
    type Result = ();

    /// Handles identity registration, including reconnects under the same id.
    fn handle(&mut self, msg: Connect, ctx: &mut Self::Context) -> Self::Result {
        let player_id = msg.player.id.clone();
        if let Some(old) = self.sessions.insert(player_id.clone(), msg.addr.clone()) {
            if old != msg.addr {
                old.do_send(ServerEvent::RoomError {
                    message: "Another session has connected with your id.".to_string(),
                });
                debug!("[Registry] Player {} replaced an older session", player_id);
            }
        }

        // Reconnect path: restore the seat and cancel the pending eviction.
        if let Some(room_id) = self.table.mark_reconnected(&player_id) {
            self.cancel_expiry_timer(room_id, &player_id, ctx);
            if let Some(match_addr) = self.matches.get(&room_id) {
                match_addr.do_send(RehomeSession {
                    player_id: player_id.clone(),
                    addr: msg.addr.clone(),
                });
            }
            if let Some(summary) = self
                .table
                .get(room_id)
                .and_then(|r| r.summary(self.matches.contains_key(&room_id)))
            {
                self.broadcast_to_room(room_id, &ServerEvent::RoomUpdated(summary));
            }
            info!("[Registry] Player {} reconnected to room {}", player_id, room_id);
        } else {
            debug!("[Registry] Player {} registered", msg.player.username);
        }
    }
}

impl Handler<Disconnect> for RoomRegistry {
    type Result = ();

    /// Handles a closed transport: keep the seat, arm the grace timer.
    fn handle(&mut self, msg: Disconnect, ctx: &mut Self::Context) -> Self::Result {
        // A stale session (already replaced by a reconnect) must not evict
        // the live one.
        match self.sessions.get(&msg.player_id) {
            Some(current) if *current == msg.addr => {
                self.sessions.remove(&msg.player_id);
            }
            _ => return,
        }

        let Some(room_id) = self.table.mark_disconnected(&msg.player_id, Instant::now()) else {
            debug!("[Registry] Player {} disconnected (not in a room)", msg.player_id);
            return;
        };

        let grace = if self.matches.contains_key(&room_id) {
            MID_MATCH_GRACE_SECS
        } else {
            PRE_MATCH_GRACE_SECS
        };
        info!(
            "[Registry] Player {} disconnected from room {}, {}s to reconnect",
            msg.player_id, room_id, grace
        );

        let player_id = msg.player_id.clone();
        let handle = ctx.run_later(Duration::from_secs(grace), move |act, ctx| {
            act.expire_disconnect(room_id, player_id, ctx);
        });
        if let Some(old) = self
            .expiry_timers
            .insert((room_id, msg.player_id.clone()), handle)
        {
            ctx.cancel_future(old);
        }
    }
}

impl Handler<ListRooms> for RoomRegistry {
    type Result = ();

    fn handle(&mut self, msg: ListRooms, _ctx: &mut Self::Context) -> Self::Result {
        msg.addr.do_send(ServerEvent::RoomsList(self.room_summaries()));
    }
}

impl Handler<CreateRoom> for RoomRegistry {
    type Result = ();

    fn handle(&mut self, msg: CreateRoom, _ctx: &mut Self::Context) -> Self::Result {
        let host_id = msg.host.id.clone();
        let host_name = msg.host.username.clone();
        match self.table.create_room(&msg.name, msg.host) {
            Ok(room) => {
                let summary = room
                    .summary(false)
                    .expect("freshly created room has its host as member");
                info!(
                    "[Registry] Room created: {} ({}) by {}",
                    summary.name, summary.id, host_name
                );
                self.sessions.insert(host_id, msg.addr.clone());
                msg.addr.do_send(ServerEvent::RoomCreated(summary));
                self.broadcast_rooms_list();
            }
            Err(e) => {
                warn!("[Registry] Room creation failed for {}: {}", host_name, e);
                msg.addr.do_send(ServerEvent::error(e));
            }
        }
    }
}

impl Handler<JoinRoom> for RoomRegistry {
    type Result = ();

    fn handle(&mut self, msg: JoinRoom, _ctx: &mut Self::Context) -> Self::Result {
        let player_id = msg.player.id.clone();
        match self.table.join_room(msg.room_id, msg.player) {
            Ok(room) => {
                let room_id = room.id;
                let summary = room
                    .summary(self.matches.contains_key(&room_id))
                    .expect("joined room has members");
                self.sessions.insert(player_id.clone(), msg.addr.clone());
                msg.addr.do_send(ServerEvent::RoomJoined(summary.clone()));
                self.broadcast_to_room(room_id, &ServerEvent::RoomUpdated(summary));
                self.broadcast_rooms_list();
                info!("[Registry] Player {} joined room {}", player_id, room_id);
            }
            Err(e) => {
                debug!("[Registry] Join failed for player {}: {}", player_id, e);
                msg.addr.do_send(ServerEvent::error(e));
            }
        }
    }
}

impl Handler<RequestToss> for RoomRegistry {
    type Result = ();

    fn handle(&mut self, msg: RequestToss, _ctx: &mut Self::Context) -> Self::Result {
        let Some(room_id) = self.table.find_room_of(&msg.player_id) else {
            self.send_to(&msg.player_id, ServerEvent::error(RegistryError::PlayerNotInRoom));
            return;
        };
        let members = match self.table.get(room_id) {
            Some(room) => room.players(),
            None => return,
        };
        match perform_toss(&members, &mut rand::rng()) {
            Ok(winner) => {
                info!("[Registry] Toss in room {} won by {}", room_id, winner.username);
                self.broadcast_to_room(room_id, &ServerEvent::TossResult { winner });
            }
            Err(e) => {
                self.send_to(&msg.player_id, ServerEvent::error(e));
            }
        }
    }
}

impl Handler<ChooseToss> for RoomRegistry {
    type Result = ();

    /// Handles the toss winner's choice: assigns sides, creates the match
    /// state, and starts the per-room match session actor.
    fn handle(&mut self, msg: ChooseToss, ctx: &mut Self::Context) -> Self::Result {
        let Some(room_id) = self.table.find_room_of(&msg.player_id) else {
            self.send_to(&msg.player_id, ServerEvent::error(RegistryError::PlayerNotInRoom));
            return;
        };
        if self.matches.contains_key(&room_id) {
            self.send_to(&msg.player_id, ServerEvent::error(RegistryError::MatchAlreadyStarted));
            return;
        }
        let choice = match TossChoice::parse(&msg.choice) {
            Ok(c) => c,
            Err(e) => {
                self.send_to(&msg.player_id, ServerEvent::error(e));
                return;
            }
        };
        let members = match self.table.get(room_id) {
            Some(room) => room.players(),
            None => return,
        };
        let state = match apply_toss_choice(&members, &msg.player_id, choice) {
            Ok(state) => state,
            Err(e) => {
                self.send_to(&msg.player_id, ServerEvent::error(e));
                return;
            }
        };

        self.broadcast_to_room(
            room_id,
            &ServerEvent::TossChoiceResult {
                choice: choice.as_str().to_string(),
                batting_id: state.team_a.id.clone(),
                bowling_id: state.team_b.id.clone(),
            },
        );

        let member_sessions: HashMap<String, SessionAddr> = members
            .iter()
            .filter_map(|p| self.sessions.get(&p.id).map(|a| (p.id.clone(), a.clone())))
            .collect();
        let match_addr = MatchSession::new(
            room_id,
            state,
            member_sessions,
            ctx.address(),
            Arc::clone(&self.recorder),
        )
        .start();
        self.matches.insert(room_id, match_addr);
        self.broadcast_rooms_list();
        info!(
            "[Registry] Match started in room {} ({} chose to {})",
            room_id,
            msg.player_id,
            choice.as_str()
        );
    }
}

impl Handler<SubmitMatchAction> for RoomRegistry {
    type Result = ();

    fn handle(&mut self, msg: SubmitMatchAction, _ctx: &mut Self::Context) -> Self::Result {
        let Some(room_id) = self.table.find_room_of(&msg.player_id) else {
            self.send_to(&msg.player_id, ServerEvent::error(RegistryError::PlayerNotInRoom));
            return;
        };
        let Some(match_addr) = self.matches.get(&room_id) else {
            self.send_to(&msg.player_id, ServerEvent::error(RegistryError::NoMatchInProgress));
            return;
        };
        match_addr.do_send(SubmitIntent {
            player_id: msg.player_id,
            action: msg.action,
        });
    }
}

impl Handler<MatchCompleted> for RoomRegistry {
    type Result = ();

    /// Handles end of match: drop the session handle so the room reverts to
    /// its pre-toss state and can host another toss.
    fn handle(&mut self, msg: MatchCompleted, _ctx: &mut Self::Context) -> Self::Result {
        self.matches.remove(&msg.room_id);
        info!(
            "[Registry] Match over in room {}: {}",
            msg.room_id, msg.result.summary
        );
        self.broadcast_rooms_list();
    }
}
