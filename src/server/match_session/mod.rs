/// Match session module: one actor per room, serializing that room's match.
pub mod server;
pub mod messages;

pub use server::MatchSession;
