//! Simulation context passed into every tick
//!
//! Holds what would otherwise be ambient globals: the random source, the
//! slow-motion factor and the difficulty. Substituting a seeded context makes
//! every scenario reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::events::{Award, Awards, GameEvent};
use crate::Difficulty;

/// Slowest allowed time scale
pub const MIN_TIME_SCALE: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct SimContext {
    /// Seeded RNG (all gameplay randomness draws from here)
    pub rng: Pcg32,
    /// Global slow-motion multiplier, 1.0 = real time
    time_scale: f32,
    pub difficulty: Difficulty,
    /// Only affects animation selection in the presentation layer
    pub first_person: bool,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub awards: Awards,
}

impl SimContext {
    pub fn seeded(seed: u64, difficulty: Difficulty) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            time_scale: 1.0,
            difficulty,
            first_person: false,
            events: Vec::new(),
            awards: Awards::default(),
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale.is_finite() {
            scale.clamp(MIN_TIME_SCALE, 1.0)
        } else {
            1.0
        };
    }

    /// Frame delta after slow motion
    #[inline]
    pub fn scaled(&self, dt: f32) -> f32 {
        dt * self.time_scale
    }

    /// Uniform draw from `[min, max)`; returns `min` for an empty range
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    pub fn emit(&mut self, event: GameEvent) {
        log::trace!("event: {:?}", event);
        self.events.push(event);
    }

    /// Grant an award, emitting the unlock event the first time only
    pub fn grant(&mut self, award: Award) {
        if self.awards.grant(award) {
            log::debug!("award unlocked: {:?}", award);
            self.emit(GameEvent::AwardUnlocked(award));
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
