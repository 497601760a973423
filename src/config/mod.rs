/// Main configuration module.
///
/// Re-exports submodules for match and room configuration.
pub mod game;
pub mod rooms;
