use serde::{Serialize, Deserialize};
use rand::Rng;

use crate::server::registry::types::RegistryError;

/// Bowling styles. The style weights which dismissal a wicket is described as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BowlType {
    Fast,
    Spin,
    Swing,
}

/// Shots the striker can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotType {
    Drive,
    Cut,
    Pull,
    Sweep,
    Defensive,
}

impl ShotType {
    pub fn noun(&self) -> &'static str {
        match self {
            ShotType::Drive => "drive",
            ShotType::Cut => "cut",
            ShotType::Pull => "pull",
            ShotType::Sweep => "sweep",
            ShotType::Defensive => "defensive shot",
        }
    }
}

/// A delivery proposed by the bowler. Ranges: power 0..1, direction -1..1, spin 0..0.5.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BowlIntent {
    #[serde(rename = "bowlType")]
    pub kind: BowlType,
    pub power: f32,
    pub direction: f32,
    pub spin: f32,
}

impl BowlIntent {
    /// Clamp all fields into their declared ranges. Out-of-range payloads are
    /// corrected rather than rejected so a bad client cannot stall the match.
    pub fn clamped(mut self) -> Self {
        self.power = self.power.clamp(0.0, 1.0);
        self.direction = self.direction.clamp(-1.0, 1.0);
        self.spin = self.spin.clamp(0.0, 0.5);
        self
    }

    /// Randomized default used when the bowler never sent an intent in time.
    pub fn synthesized<R: Rng>(rng: &mut R) -> Self {
        let kind = match rng.random_range(0..3) {
            0 => BowlType::Fast,
            1 => BowlType::Spin,
            _ => BowlType::Swing,
        };
        BowlIntent {
            kind,
            power: rng.random_range(0.2..=1.0),
            direction: rng.random_range(-1.0..=1.0),
            spin: rng.random_range(0.0..=0.5),
        }
    }
}

/// A shot played by the striker. Ranges: power 0..1, timing -1..1, direction -1..1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BatIntent {
    #[serde(rename = "shotType")]
    pub shot: ShotType,
    pub power: f32,
    pub timing: f32,
    pub direction: f32,
}

impl BatIntent {
    pub fn clamped(mut self) -> Self {
        self.power = self.power.clamp(0.0, 1.0);
        self.timing = self.timing.clamp(-1.0, 1.0);
        self.direction = self.direction.clamp(-1.0, 1.0);
        self
    }

    /// Randomized default used when the striker never sent an intent in time.
    pub fn synthesized<R: Rng>(rng: &mut R) -> Self {
        let shot = match rng.random_range(0..5) {
            0 => ShotType::Drive,
            1 => ShotType::Cut,
            2 => ShotType::Pull,
            3 => ShotType::Sweep,
            _ => ShotType::Defensive,
        };
        BatIntent {
            shot,
            power: rng.random_range(0.2..=1.0),
            timing: rng.random_range(-1.0..=1.0),
            direction: rng.random_range(-1.0..=1.0),
        }
    }
}

/// One action submitted over the wire, either side of a delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MatchAction {
    Bowl(BowlIntent),
    Bat(BatIntent),
}

/// Scoreboard notation for a resolved delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryNotation {
    Runs(u32),
    Wicket,
    Wide,
    NoBall,
}

impl DeliveryNotation {
    pub fn label(&self) -> String {
        match self {
            DeliveryNotation::Runs(n) => n.to_string(),
            DeliveryNotation::Wicket => "W".to_string(),
            DeliveryNotation::Wide => "WD".to_string(),
            DeliveryNotation::NoBall => "NB".to_string(),
        }
    }

    /// Wides and no-balls do not count toward the over.
    pub fn is_legal(&self) -> bool {
        !matches!(self, DeliveryNotation::Wide | DeliveryNotation::NoBall)
    }
}

/// A scored delivery as shown to clients, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryRecord {
    pub notation: String,
    pub description: String,
}

/// What the toss winner elects to do first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TossChoice {
    Bat,
    Bowl,
}

impl TossChoice {
    /// Parse the wire string. Anything but "bat" or "bowl" is rejected.
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        match s {
            "bat" => Ok(TossChoice::Bat),
            "bowl" => Ok(TossChoice::Bowl),
            _ => Err(RegistryError::InvalidChoice),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TossChoice::Bat => "bat",
            TossChoice::Bowl => "bowl",
        }
    }
}

/// Per-innings scoreboard. Overs are derived from `legal_balls`, never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InningsScore {
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub extras: u32,
    pub boundaries: u32,
    pub sixes: u32,
}

impl InningsScore {
    /// Conventional "overs.balls" display, e.g. 30 legal balls -> "5.0".
    pub fn overs_display(&self) -> String {
        format!("{}.{}", self.legal_balls / 6, self.legal_balls % 6)
    }
}

/// How a win margin is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginKind {
    Runs,
    Wickets,
    Tie,
}

/// Final verdict of a match, produced exactly once on completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub winner_id: Option<String>,
    pub margin_value: Option<u32>,
    pub margin_kind: MarginKind,
    pub summary: String,
}
