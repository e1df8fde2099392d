//! Wave Siege - combat core of a lane-based wave-defense shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, weapon, collisions, wave economy)
//! - `settings`: Player-facing configuration (difficulty, reload assists, slow motion)
//! - `summary`: End-of-wave summaries for the presentation layer

pub mod settings;
pub mod sim;
pub mod summary;

pub use settings::Settings;
pub use summary::{WaveLog, WaveSummary};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Depth of the player's defense line
    pub const PLAYER_DEPTH: f32 = 0.0;
    /// Depth at which actors enter the field
    pub const SPAWN_DEPTH: f32 = 60.0;
    /// Escaping actors are purged once they pass this depth
    pub const ESCAPE_DEPTH: f32 = -12.0;
    /// Lateral half-extent of the lane band
    pub const LANE_HALF_WIDTH: f32 = 8.0;
    /// Number of spawn lanes (one actor per lane)
    pub const LANE_COUNT: usize = 7;
    /// Bonus crossers are purged past this lateral offset
    pub const LATERAL_BOUNDARY: f32 = 12.0;

    /// Depth units per second = speed / SPEED_NORMALIZATION
    pub const SPEED_NORMALIZATION: f32 = 10.0;
    /// Lateral half-width of an actor's hit interval at scale 1
    pub const ENEMY_HALF_WIDTH: f32 = 0.75;
    /// Seconds a dying actor lingers before it is purged
    pub const DYING_DURATION: f32 = 2.0;
    /// Hits closer than this to the player are point-blank
    pub const POINT_BLANK_DISTANCE: f32 = 3.0;
    /// Splash radius around an actor struck by an explosive projectile
    pub const EXPLOSION_RADIUS: f32 = 4.0;
    /// Kills within this many seconds of first engagement count as speed kills
    pub const SPEED_KILL_WINDOW: f32 = 1.0;
    /// Minimum actors caught in one blast for the chain-reaction award
    pub const CHAIN_REACTION_KILLS: u32 = 3;

    /// Player defaults
    pub const PLAYER_MAX_HEALTH: u32 = 5;
    pub const PLAYER_START_GRENADES: u32 = 2;
    pub const PLAYER_HIT_RADIUS: f32 = 1.25;
    /// Seconds the hit feedback pulse takes to fade
    pub const HIT_PULSE_DURATION: f32 = 0.5;

    /// Bonus crossers pay this much when their reward draw is currency
    pub const BONUS_CURRENCY: u32 = 50;

    /// Rest between waves (seconds)
    pub const BREATHER_DURATION: f32 = 3.0;
}

/// Difficulty setting chosen by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier applied to every kill's score
    pub fn score_multiplier(&self) -> f32 {
        match self {
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    /// Multiplier applied to actor walking speed at spawn
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.2,
        }
    }

    /// Range (seconds) the charger's strut countdown is drawn from
    pub fn charge_countdown_range(&self) -> (f32, f32) {
        match self {
            Difficulty::Normal => (3.0, 6.0),
            Difficulty::Hard => (1.5, 3.5),
        }
    }

    /// Speed multiplier applied when a charger starts charging
    pub fn charge_factor(&self) -> f32 {
        match self {
            Difficulty::Normal => 2.5,
            Difficulty::Hard => 3.0,
        }
    }
}

/// Evenly spaced lateral position of a lane
#[inline]
pub fn lane_x(lane: usize) -> f32 {
    use consts::{LANE_COUNT, LANE_HALF_WIDTH};
    if LANE_COUNT < 2 {
        return 0.0;
    }
    let step = 2.0 * LANE_HALF_WIDTH / (LANE_COUNT - 1) as f32;
    -LANE_HALF_WIDTH + step * lane.min(LANE_COUNT - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_positions_span_band() {
        assert_eq!(lane_x(0), -consts::LANE_HALF_WIDTH);
        assert_eq!(lane_x(consts::LANE_COUNT - 1), consts::LANE_HALF_WIDTH);
        assert!(lane_x(consts::LANE_COUNT / 2).abs() < 1e-5);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("normal"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }
}
