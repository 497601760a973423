/// Registry module: room lifecycle, membership, and disconnect handling.
pub mod server;
pub mod rooms;
pub mod types;
pub mod tests;
