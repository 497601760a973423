/// WebSocket session handler for one client connection.
///
/// This actor parses inbound events, relays them to the room registry, and
/// serializes outbound server events back to the client. Identity arrives
/// either through query parameters at connect time or a `player.register`
/// event; everything that targets a room requires it.

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use std::borrow::Cow;

use crate::server::events::{ClientEvent, ServerEvent};
use crate::server::registry::server::{
    ChooseToss, Connect, CreateRoom, Disconnect, JoinRoom, ListRooms, RequestToss, RoomRegistry,
    SubmitMatchAction,
};
use crate::server::registry::types::Player;
use crate::server::ws_error::{room_error_message, ws_error_message};

pub struct ClientSession {
    /// Registered identity, if announced yet.
    pub player: Option<Player>,
    pub registry: Addr<RoomRegistry>,
}

impl Actor for ClientSession {
    type Context = ws::WebsocketContext<Self>;

    /// Called when the session starts. A pre-registered identity (query
    /// parameters) connects to the registry straight away.
    fn started(&mut self, ctx: &mut Self::Context) {
        if let Some(player) = self.player.clone() {
            self.registry.do_send(Connect {
                player,
                addr: ctx.address(),
            });
        }
    }

    /// Called when the transport closes. The registry keeps the seat and
    /// arms the disconnect grace timer.
    fn stopped(&mut self, ctx: &mut Self::Context) {
        if let Some(player) = &self.player {
            self.registry.do_send(Disconnect {
                player_id: player.id.clone(),
                addr: ctx.address(),
            });
        }
    }
}

impl ClientSession {
    fn dispatch(&mut self, event: ClientEvent, ctx: &mut ws::WebsocketContext<Self>) {
        match event {
            ClientEvent::Register(player) => {
                self.player = Some(player.clone());
                self.registry.do_send(Connect {
                    player,
                    addr: ctx.address(),
                });
            }
            ClientEvent::RoomsList => {
                self.registry.do_send(ListRooms {
                    addr: ctx.address(),
                });
            }
            ClientEvent::RoomCreate { name, host } => {
                // The payload identity is authoritative here, as in joins; a
                // connection that never registered becomes this player.
                if self.player.is_none() {
                    self.player = Some(host.clone());
                }
                self.registry.do_send(CreateRoom {
                    name,
                    host,
                    addr: ctx.address(),
                });
            }
            ClientEvent::RoomJoin { room_id, player } => {
                if self.player.is_none() {
                    self.player = Some(player.clone());
                }
                self.registry.do_send(JoinRoom {
                    room_id,
                    player,
                    addr: ctx.address(),
                });
            }
            ClientEvent::TossRequest => {
                if let Some(player_id) = self.registered_id(ctx) {
                    self.registry.do_send(RequestToss { player_id });
                }
            }
            ClientEvent::TossChoice { choice } => {
                if let Some(player_id) = self.registered_id(ctx) {
                    self.registry.do_send(ChooseToss { player_id, choice });
                }
            }
            ClientEvent::MatchAction(action) => {
                if let Some(player_id) = self.registered_id(ctx) {
                    self.registry.do_send(SubmitMatchAction { player_id, action });
                }
            }
            ClientEvent::Ping => {
                // Keepalive only.
            }
        }
    }

    fn registered_id(&self, ctx: &mut ws::WebsocketContext<Self>) -> Option<String> {
        match &self.player {
            Some(player) => Some(player.id.clone()),
            None => {
                ctx.text(room_error_message("Player not registered"));
                None
            }
        }
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ClientSession {
    /// Handles incoming WebSocket messages from the client.
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => self.dispatch(event, ctx),
                Err(_) => {
                    ctx.text(ws_error_message(
                        "INVALID_MESSAGE",
                        "Invalid client message",
                        None,
                    ));
                }
            },
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

impl Handler<ServerEvent> for ClientSession {
    type Result = ();

    /// Handles events sent from the registry or a match session.
    fn handle(&mut self, msg: ServerEvent, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                // Serialization error: notify client and close connection.
                log::error!("Failed to serialize ServerEvent: {}", e);
                ctx.text(ws_error_message("INTERNAL", "Internal server error", None));
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Error,
                    description: Some("Internal server error".into()),
                }));
                ctx.stop();
            }
        }
    }
}

/// WebSocket endpoint.
///
/// Optional query parameters `player` (id) and `username` pre-register the
/// identity, which is how a reconnecting client reclaims its seat without a
/// fresh `player.register` round-trip.
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let mut player_id: Option<String> = None;
    let mut username = String::new();

    for kv in req.query_string().split('&') {
        let mut split = kv.split('=');
        match (split.next(), split.next()) {
            (Some("player"), Some(id)) if !id.is_empty() => {
                player_id = Some(id.to_string());
            }
            (Some("username"), Some(name)) => {
                username = urlencoding::decode(name)
                    .unwrap_or_else(|_| Cow::Borrowed(""))
                    .into_owned();
            }
            _ => {}
        }
    }

    let player = player_id.map(|id| {
        if username.is_empty() {
            username = default_username(&id);
        }
        Player {
            id,
            username: username.clone(),
        }
    });

    ws::start(
        ClientSession {
            player,
            registry: data.registry_addr.clone(),
        },
        &req,
        stream,
    )
}

/// Fallback display name derived from the id. Ids are opaque client strings,
/// so the prefix is taken in characters, not bytes.
fn default_username(id: &str) -> String {
    let prefix: String = id.chars().take(6).collect();
    format!("Player_{}", prefix)
}

#[cfg(test)]
mod tests {
    use super::default_username;

    #[test]
    fn test_default_username_truncates_long_ids() {
        assert_eq!(default_username("abcdefghij"), "Player_abcdef");
    }

    #[test]
    fn test_default_username_keeps_short_ids_whole() {
        assert_eq!(default_username("ab"), "Player_ab");
    }

    #[test]
    fn test_default_username_handles_multibyte_ids() {
        assert_eq!(default_username("aあああ"), "Player_aあああ");
    }
}
