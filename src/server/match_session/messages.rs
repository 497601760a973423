use actix::prelude::*;

use crate::game::types::MatchAction;
use crate::server::session::ClientSession;

/// A bowl or bat intent routed from the registry. Out-of-turn submissions are
/// silently dropped by the session.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SubmitIntent {
    pub player_id: String,
    pub action: MatchAction,
}

/// A participant reconnected; future broadcasts go to the new session, which
/// immediately receives the current snapshot.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RehomeSession {
    pub player_id: String,
    pub addr: Addr<ClientSession>,
}

/// Stop the match session (room closed or seat abandoned).
#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;
