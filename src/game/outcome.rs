//! Outcome resolver: maps a (bowl intent, bat intent) pair to a scored verdict.
//!
//! Pure functions over an injected random source so outcomes are reproducible
//! under test. `resolve` samples the random factor itself; `resolve_with_factor`
//! is the deterministic seam.

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::config::game::EXTRA_CHANCE;
use crate::game::types::{BowlIntent, BatIntent, BowlType, ShotType, DeliveryNotation};

/// Uniform range of the luck factor applied to run potential.
pub const RANDOM_FACTOR_MIN: f32 = 0.7;
pub const RANDOM_FACTOR_MAX: f32 = 1.3;

/// Maps run potential onto the 0..6 run scale. A full-power, perfectly timed
/// shot with maximum luck floors to six.
pub const RUN_POTENTIAL_SCALE: f32 = 5.0;

/// Connection quality band, derived from shot effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotQuality {
    Poor,
    Decent,
    Good,
    Perfect,
}

/// Resolver verdict for one delivery, before the extras roll.
#[derive(Debug, Clone)]
pub struct ShotOutcome {
    pub runs: u32,
    pub is_wicket: bool,
    pub is_boundary: bool,
    pub quality: ShotQuality,
    pub description: String,
    pub shot_effectiveness: f32,
}

/// Resolve a delivery with a freshly sampled random factor.
pub fn resolve<R: Rng>(bowl: &BowlIntent, bat: &BatIntent, rng: &mut R) -> ShotOutcome {
    let random_factor = rng.random_range(RANDOM_FACTOR_MIN..=RANDOM_FACTOR_MAX);
    resolve_with_factor(bowl, bat, random_factor, rng)
}

/// Resolve a delivery with an explicit random factor (test seam).
///
/// Timing is forgiving within |timing| < 0.2 and useless beyond it; playing
/// against the ball's direction halves the connection. The two combine 60/40
/// into shot effectiveness, which picks the quality band.
pub fn resolve_with_factor<R: Rng>(
    bowl: &BowlIntent,
    bat: &BatIntent,
    random_factor: f32,
    rng: &mut R,
) -> ShotOutcome {
    let timing_effectiveness = 1.0 - (bat.timing.abs() * 5.0).min(1.0);
    let direction_factor = 1.0 - ((bowl.direction - bat.direction).abs() / 2.0).min(1.0);
    let shot_effectiveness = timing_effectiveness * 0.6 + direction_factor * 0.4;

    let run_potential = shot_effectiveness * bat.power * random_factor * RUN_POTENTIAL_SCALE;

    if shot_effectiveness < 0.2 {
        // Poor connection, high chance of a wicket.
        let quality = ShotQuality::Poor;
        if rng.random_bool(0.7) {
            return wicket_outcome(bowl.kind, quality, shot_effectiveness, rng);
        }
        let runs = rng.random_range(0..2);
        runs_outcome(bat.shot, quality, runs, false, shot_effectiveness)
    } else if shot_effectiveness < 0.5 {
        // Decent connection, small wicket chance.
        let quality = ShotQuality::Decent;
        if rng.random_bool(0.2) {
            return wicket_outcome(bowl.kind, quality, shot_effectiveness, rng);
        }
        let runs = rng.random_range(0..3);
        runs_outcome(bat.shot, quality, runs, false, shot_effectiveness)
    } else if shot_effectiveness < 0.8 {
        // Good connection, very small wicket chance, capped at four.
        let quality = ShotQuality::Good;
        if rng.random_bool(0.05) {
            return wicket_outcome(bowl.kind, quality, shot_effectiveness, rng);
        }
        let runs = (run_potential.floor() as u32).min(4);
        runs_outcome(bat.shot, quality, runs, runs == 4, shot_effectiveness)
    } else {
        // Perfect connection never falls to a wicket.
        let quality = ShotQuality::Perfect;
        let raw = (run_potential.floor() as u32).min(6);
        if raw >= 4 {
            let runs = if rng.random_bool(0.3) { 6 } else { 4 };
            let suffix = if runs == 6 { " - SIX!" } else { " - FOUR!" };
            ShotOutcome {
                runs,
                is_wicket: false,
                is_boundary: true,
                quality,
                description: format!("{}{}", shot_description(bat.shot, quality), suffix),
                shot_effectiveness,
            }
        } else {
            runs_outcome(bat.shot, quality, raw, false, shot_effectiveness)
        }
    }
}

/// Convert a verdict into scoreboard notation, rolling for a wide or no-ball.
/// Extras never replace a wicket.
pub fn final_notation<R: Rng>(verdict: &ShotOutcome, rng: &mut R) -> DeliveryNotation {
    if verdict.is_wicket {
        return DeliveryNotation::Wicket;
    }
    if rng.random_bool(EXTRA_CHANCE) {
        return if rng.random_bool(0.5) {
            DeliveryNotation::Wide
        } else {
            DeliveryNotation::NoBall
        };
    }
    DeliveryNotation::Runs(verdict.runs)
}

fn wicket_outcome<R: Rng>(
    bowl: BowlType,
    quality: ShotQuality,
    shot_effectiveness: f32,
    rng: &mut R,
) -> ShotOutcome {
    ShotOutcome {
        runs: 0,
        is_wicket: true,
        is_boundary: false,
        quality,
        description: wicket_description(bowl, rng),
        shot_effectiveness,
    }
}

fn runs_outcome(
    shot: ShotType,
    quality: ShotQuality,
    runs: u32,
    is_boundary: bool,
    shot_effectiveness: f32,
) -> ShotOutcome {
    let plural = if runs == 1 { "" } else { "s" };
    let suffix = if is_boundary { " - FOUR!" } else { "" };
    ShotOutcome {
        runs,
        is_wicket: false,
        is_boundary,
        quality,
        description: format!(
            "{} for {} run{}{}",
            shot_description(shot, quality),
            runs,
            plural,
            suffix
        ),
        shot_effectiveness,
    }
}

/// Pick a dismissal line, weighted by bowling style.
pub fn wicket_description<R: Rng>(bowl: BowlType, rng: &mut R) -> String {
    const WICKET_LINES: [&str; 5] = [
        "BOWLED! The stumps are shattered!",
        "CAUGHT! A good catch in the field!",
        "LBW! That looked plumb in front!",
        "STUMPED! The batsman was out of the crease!",
        "CAUGHT BEHIND! The keeper makes no mistake!",
    ];
    let weights: [usize; 5] = match bowl {
        BowlType::Fast => [0, 1, 1, 4, 2],
        BowlType::Spin => [0, 1, 2, 3, 3],
        BowlType::Swing => [0, 0, 1, 4, 2],
    };
    WICKET_LINES[weights[rng.random_range(0..weights.len())]].to_string()
}

/// Commentary for the shot itself, by type and quality band.
pub fn shot_description(shot: ShotType, quality: ShotQuality) -> String {
    if shot == ShotType::Defensive {
        return match quality {
            ShotQuality::Poor => "A shaky defensive shot",
            ShotQuality::Decent => "A solid block",
            ShotQuality::Good => "A controlled defensive shot",
            ShotQuality::Perfect => "A masterful defensive shot",
        }
        .to_string();
    }
    let adjective = match (shot, quality) {
        (ShotType::Pull, ShotQuality::Perfect) => "powerful",
        (_, ShotQuality::Poor) => "mistimed",
        (_, ShotQuality::Decent) => "steady",
        (_, ShotQuality::Good) => "well-timed",
        (_, ShotQuality::Perfect) => "brilliant",
    };
    format!("A {} {}", adjective, shot.noun())
}

/// Fallback commentary used for outcomes the resolver did not describe,
/// notably wides and no-balls injected after the verdict.
pub fn generic_description(notation: DeliveryNotation) -> String {
    match notation {
        DeliveryNotation::Runs(0) => "No run. Good defensive shot.".to_string(),
        DeliveryNotation::Runs(1) => "Single run taken with a quick push.".to_string(),
        DeliveryNotation::Runs(2) => {
            "Two runs as the batsmen run quickly between the wickets.".to_string()
        }
        DeliveryNotation::Runs(3) => "Three runs taken with good running.".to_string(),
        DeliveryNotation::Runs(4) => "FOUR! The ball races to the boundary.".to_string(),
        DeliveryNotation::Runs(_) => {
            "SIX! That's gone all the way over the boundary rope!".to_string()
        }
        DeliveryNotation::Wicket => "OUT! The batsman has to go.".to_string(),
        DeliveryNotation::Wide => "Wide ball. Extra run to the batting side.".to_string(),
        DeliveryNotation::NoBall => {
            "No ball called by the umpire. Free hit coming up!".to_string()
        }
    }
}
