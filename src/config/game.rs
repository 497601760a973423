/// Match configuration constants.
///
/// This module defines the main gameplay parameters such as match length,
/// delivery timing, and scoring limits.
pub const TOTAL_OVERS: u32 = 5; // Overs per innings.

/// Legal deliveries in one over.
pub const BALLS_PER_OVER: u32 = 6;

/// Wickets that end an innings.
pub const MAX_WICKETS: u32 = 10;

/// Time (in seconds) to wait for the second intent of a delivery before
/// synthesizing the missing one. Keeps a silent peer from stalling the match.
pub const INTENT_WAIT_SECS: u64 = 2;

/// How many recent deliveries are kept in the match snapshot.
pub const RECENT_DELIVERIES_CAP: usize = 10;

/// Probability that a non-wicket delivery is called a wide or a no-ball.
pub const EXTRA_CHANCE: f64 = 0.05;
