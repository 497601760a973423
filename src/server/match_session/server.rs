/// Per-room match session actor.
///
/// Owns one match's state and serializes every transition on it. Buffers the
/// latest bowl and bat intents for the live delivery; resolution fires when
/// both are present, or after a bounded wait with the missing side
/// synthesized, so a silent peer cannot stall the match.

use actix::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use log::{info, debug, error};

use crate::config::game::INTENT_WAIT_SECS;
use crate::game::outcome;
use crate::game::state::MatchState;
use crate::game::stats::MatchRecorder;
use crate::game::types::{BatIntent, BowlIntent, DeliveryNotation, MatchAction};
use crate::server::events::ServerEvent;
use crate::server::registry::server::{MatchCompleted, RoomRegistry};
use crate::server::session::ClientSession;
use super::messages::{RehomeSession, Shutdown, SubmitIntent};

pub struct MatchSession {
    room_id: Uuid,
    state: MatchState,
    /// Live client sessions of the two participants, by player id.
    sessions: HashMap<String, Addr<ClientSession>>,
    pending_bowl: Option<BowlIntent>,
    pending_bat: Option<BatIntent>,
    /// Armed when the first intent of a delivery arrives.
    intent_timer: Option<SpawnHandle>,
    registry: Addr<RoomRegistry>,
    recorder: Arc<dyn MatchRecorder>,
}

impl MatchSession {
    pub fn new(
        room_id: Uuid,
        state: MatchState,
        sessions: HashMap<String, Addr<ClientSession>>,
        registry: Addr<RoomRegistry>,
        recorder: Arc<dyn MatchRecorder>,
    ) -> Self {
        Self {
            room_id,
            state,
            sessions,
            pending_bowl: None,
            pending_bat: None,
            intent_timer: None,
            registry,
            recorder,
        }
    }

    fn broadcast(&self, event: ServerEvent) {
        for addr in self.sessions.values() {
            addr.do_send(event.clone());
        }
    }

    /// Resolve the live delivery, synthesizing whichever intent is missing.
    fn resolve_delivery(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.intent_timer.take() {
            ctx.cancel_future(handle);
        }
        if self.state.is_complete() {
            return;
        }

        let rng = &mut rand::rng();
        let bowl = self
            .pending_bowl
            .take()
            .unwrap_or_else(|| BowlIntent::synthesized(rng));
        let bat = self
            .pending_bat
            .take()
            .unwrap_or_else(|| BatIntent::synthesized(rng));

        let verdict = outcome::resolve(&bowl, &bat, rng);
        let notation = outcome::final_notation(&verdict, rng);
        // The resolver described the shot; extras get umpire commentary.
        let description = match notation {
            DeliveryNotation::Wide | DeliveryNotation::NoBall => {
                outcome::generic_description(notation)
            }
            _ => verdict.description.clone(),
        };
        self.state.apply_delivery(notation, description);

        debug!(
            "[MatchSession] Delivery resolved in room {}: {} (quality {:?})",
            self.room_id,
            notation.label(),
            verdict.quality
        );
        self.broadcast(ServerEvent::MatchStateUpdate(self.state.clone()));

        if self.state.is_complete() {
            self.finish(ctx);
        }
    }

    /// Broadcast the result, record the match once, and stop the actor.
    fn finish(&mut self, ctx: &mut Context<Self>) {
        let Some(result) = self.state.result.clone() else {
            error!(
                "[MatchSession] Match in room {} completed without a result",
                self.room_id
            );
            ctx.stop();
            return;
        };
        info!("[MatchSession] Match over in room {}: {}", self.room_id, result.summary);
        self.broadcast(ServerEvent::MatchOver(result.clone()));

        let participant_ids = [self.state.team_a.id.clone(), self.state.team_b.id.clone()];
        if let Err(e) = self.recorder.record_completed_match(
            &result,
            &self.state.innings_scores,
            &participant_ids,
        ) {
            // The collaborator owns durability; never block the broadcast.
            error!("[MatchSession] Failed to record match in room {}: {}", self.room_id, e);
        }

        self.registry.do_send(MatchCompleted {
            room_id: self.room_id,
            result,
        });
        ctx.stop();
    }
}

impl Actor for MatchSession {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(
            "[MatchSession] Match started in room {}: {} batting, {} bowling",
            self.room_id, self.state.team_a.username, self.state.team_b.username
        );
        self.broadcast(ServerEvent::MatchStarted(self.state.clone()));
    }
}

impl Handler<SubmitIntent> for MatchSession {
    type Result = ();

    /// Buffers the latest intent of each kind. Submissions from the wrong
    /// role, or after completion, are dropped without error to tolerate
    /// duplicate and late client messages.
    fn handle(&mut self, msg: SubmitIntent, ctx: &mut Self::Context) -> Self::Result {
        if self.state.is_complete() {
            return;
        }
        match msg.action {
            MatchAction::Bowl(intent) if msg.player_id == self.state.bowler_id => {
                self.pending_bowl = Some(intent.clamped());
            }
            MatchAction::Bat(intent) if msg.player_id == self.state.striker_id => {
                self.pending_bat = Some(intent.clamped());
            }
            _ => {
                debug!(
                    "[MatchSession] Ignoring out-of-turn action from player {} in room {}",
                    msg.player_id, self.room_id
                );
                return;
            }
        }

        if self.pending_bowl.is_some() && self.pending_bat.is_some() {
            self.resolve_delivery(ctx);
        } else if self.intent_timer.is_none() {
            let handle = ctx.run_later(Duration::from_secs(INTENT_WAIT_SECS), |act, ctx| {
                act.intent_timer = None;
                act.resolve_delivery(ctx);
            });
            self.intent_timer = Some(handle);
        }
    }
}

impl Handler<RehomeSession> for MatchSession {
    type Result = ();

    /// Points broadcasts at a reconnected participant's new session and sends
    /// them the current snapshot immediately.
    fn handle(&mut self, msg: RehomeSession, _ctx: &mut Self::Context) -> Self::Result {
        msg.addr.do_send(ServerEvent::MatchStateUpdate(self.state.clone()));
        self.sessions.insert(msg.player_id, msg.addr);
    }
}

impl Handler<Shutdown> for MatchSession {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        info!("[MatchSession] Shutting down match in room {}", self.room_id);
        ctx.stop();
    }
}
