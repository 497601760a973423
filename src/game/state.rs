//! Authoritative match state: toss, scoring, over and innings bookkeeping,
//! and match completion. Pure data and transitions; the actor layer owns
//! timing and broadcast.

use serde::{Serialize, Deserialize};
use rand::Rng;

use crate::config::game::{TOTAL_OVERS, BALLS_PER_OVER, MAX_WICKETS, RECENT_DELIVERIES_CAP};
use crate::game::types::{
    DeliveryNotation, DeliveryRecord, InningsScore, MarginKind, MatchResult, TossChoice,
};
use crate::server::registry::types::{Player, RegistryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    InProgress,
    Complete,
}

/// One match between two participants. `team_a` bats first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    pub team_a: Player,
    pub team_b: Player,
    /// 1 while the first innings is live, 2 for the chase.
    pub innings_index: u8,
    pub innings_scores: [InningsScore; 2],
    pub striker_id: String,
    pub bowler_id: String,
    pub over: u32,
    pub ball_in_over: u32,
    pub total_overs: u32,
    pub max_wickets: u32,
    /// Most recent first, capped at `RECENT_DELIVERIES_CAP`.
    pub recent_deliveries: Vec<DeliveryRecord>,
    pub status: MatchStatus,
    pub result: Option<MatchResult>,
}

/// Pick a toss winner uniformly among the room's members.
pub fn perform_toss<R: Rng>(members: &[Player], rng: &mut R) -> Result<Player, RegistryError> {
    if members.len() < 2 {
        return Err(RegistryError::InsufficientPlayers);
    }
    Ok(members[rng.random_range(0..members.len())].clone())
}

/// Turn the toss winner's choice into an initialized match.
pub fn apply_toss_choice(
    members: &[Player],
    winner_id: &str,
    choice: TossChoice,
) -> Result<MatchState, RegistryError> {
    if members.len() < 2 {
        return Err(RegistryError::InsufficientPlayers);
    }
    let winner = members
        .iter()
        .find(|p| p.id == winner_id)
        .ok_or(RegistryError::PlayerNotInRoom)?;
    let opponent = members
        .iter()
        .find(|p| p.id != winner_id)
        .ok_or(RegistryError::InsufficientPlayers)?;
    let (batting_first, bowling_first) = match choice {
        TossChoice::Bat => (winner, opponent),
        TossChoice::Bowl => (opponent, winner),
    };
    Ok(MatchState::new(batting_first.clone(), bowling_first.clone()))
}

impl MatchState {
    pub fn new(team_a: Player, team_b: Player) -> Self {
        let striker_id = team_a.id.clone();
        let bowler_id = team_b.id.clone();
        MatchState {
            team_a,
            team_b,
            innings_index: 1,
            innings_scores: [InningsScore::default(), InningsScore::default()],
            striker_id,
            bowler_id,
            over: 0,
            ball_in_over: 0,
            total_overs: TOTAL_OVERS,
            max_wickets: MAX_WICKETS,
            recent_deliveries: Vec::new(),
            status: MatchStatus::InProgress,
            result: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == MatchStatus::Complete
    }

    pub fn batting_score(&self) -> &InningsScore {
        &self.innings_scores[(self.innings_index - 1) as usize]
    }

    fn batting_score_mut(&mut self) -> &mut InningsScore {
        &mut self.innings_scores[(self.innings_index - 1) as usize]
    }

    /// Apply one resolved delivery to the scoreboard and advance the match.
    /// A no-op once the match is complete.
    pub fn apply_delivery(&mut self, notation: DeliveryNotation, description: String) {
        if self.is_complete() {
            return;
        }

        self.recent_deliveries.insert(
            0,
            DeliveryRecord {
                notation: notation.label(),
                description,
            },
        );
        self.recent_deliveries.truncate(RECENT_DELIVERIES_CAP);

        let max_wickets = self.max_wickets;
        {
            let score = self.batting_score_mut();
            match notation {
                DeliveryNotation::Runs(n) => {
                    let n = n.min(6);
                    score.runs += n;
                    if n == 4 {
                        score.boundaries += 1;
                    }
                    if n == 6 {
                        score.sixes += 1;
                    }
                }
                DeliveryNotation::Wicket => {
                    // The innings ends at max_wickets, so this can only be hit
                    // below the cap; the guard confines a logic error to this match.
                    if score.wickets < max_wickets {
                        score.wickets += 1;
                    }
                }
                DeliveryNotation::Wide | DeliveryNotation::NoBall => {
                    score.runs += 1;
                    score.extras += 1;
                }
            }
        }

        if !notation.is_legal() {
            // Wides and no-balls do not advance the over.
            return;
        }

        self.batting_score_mut().legal_balls += 1;
        self.ball_in_over += 1;

        let mut over_rolled = false;
        if self.ball_in_over >= BALLS_PER_OVER {
            self.over += 1;
            self.ball_in_over = 0;
            over_rolled = true;
        }

        let innings_done =
            self.batting_score().wickets >= self.max_wickets || self.over >= self.total_overs;
        if innings_done {
            // The innings transition performs the single role swap; the
            // end-of-over swap is skipped when the over closes the innings.
            self.end_innings();
        } else if over_rolled {
            self.swap_roles();
        }
    }

    fn swap_roles(&mut self) {
        std::mem::swap(&mut self.striker_id, &mut self.bowler_id);
    }

    fn end_innings(&mut self) {
        if self.innings_index == 1 {
            self.innings_index = 2;
            self.over = 0;
            self.ball_in_over = 0;
            self.swap_roles();
        } else {
            self.finish_match();
        }
    }

    /// Compute the result and transition to `Complete`. Called exactly once.
    fn finish_match(&mut self) {
        let first = self.innings_scores[0].runs;
        let second = self.innings_scores[1].runs;

        let result = if first > second {
            let margin = first - second;
            MatchResult {
                winner_id: Some(self.team_a.id.clone()),
                margin_value: Some(margin),
                margin_kind: MarginKind::Runs,
                summary: format!("{} won by {} runs!", self.team_a.username, margin),
            }
        } else if second > first {
            let margin = self.max_wickets - self.innings_scores[1].wickets;
            MatchResult {
                winner_id: Some(self.team_b.id.clone()),
                margin_value: Some(margin),
                margin_kind: MarginKind::Wickets,
                summary: format!("{} won by {} wickets!", self.team_b.username, margin),
            }
        } else {
            MatchResult {
                winner_id: None,
                margin_value: None,
                margin_kind: MarginKind::Tie,
                summary: "Match tied!".to_string(),
            }
        };

        self.result = Some(result);
        self.status = MatchStatus::Complete;
    }
}
