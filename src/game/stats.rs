//! Narrow contract for the external stats collaborator.
//!
//! Called exactly once when a match completes. Durability and retries are the
//! collaborator's problem; a failure here is logged and never blocks the
//! result broadcast.

use log::info;
use thiserror::Error;

use crate::game::types::{InningsScore, MatchResult};

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("stats backend unavailable: {0}")]
    Unavailable(String),
}

pub trait MatchRecorder: Send + Sync {
    fn record_completed_match(
        &self,
        result: &MatchResult,
        final_scores: &[InningsScore; 2],
        participant_ids: &[String],
    ) -> Result<(), RecorderError>;
}

/// Default recorder: logs the completed match instead of persisting it.
pub struct LogRecorder;

impl MatchRecorder for LogRecorder {
    fn record_completed_match(
        &self,
        result: &MatchResult,
        final_scores: &[InningsScore; 2],
        participant_ids: &[String],
    ) -> Result<(), RecorderError> {
        info!(
            "[Stats] Match recorded: {} | {}/{} ({}) vs {}/{} ({}) | players={:?}",
            result.summary,
            final_scores[0].runs,
            final_scores[0].wickets,
            final_scores[0].overs_display(),
            final_scores[1].runs,
            final_scores[1].wickets,
            final_scores[1].overs_display(),
            participant_ids,
        );
        Ok(())
    }
}
