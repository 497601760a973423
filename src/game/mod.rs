pub mod types;
pub mod state;
pub mod outcome;
pub mod stats;
pub mod tests;
