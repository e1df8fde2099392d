//! The defending player

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Eye-level anchor on the defense line
    pub position: Vec3,
    pub health: u32,
    pub max_health: u32,
    pub alive: bool,
    pub grenades: u32,
    /// Hit feedback (1.0 on impact, fades to 0)
    pub hit_pulse: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.5, PLAYER_DEPTH),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            alive: true,
            grenades: PLAYER_START_GRENADES,
            hit_pulse: 0.0,
        }
    }
}

impl Player {
    /// Lose `amount` health; returns true if this killed the player
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.hit_pulse = 1.0;
        if self.health == 0 {
            self.alive = false;
            log::info!("player killed");
            return true;
        }
        false
    }

    pub fn heal(&mut self, amount: u32) {
        if self.alive {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    /// Fade the hit pulse
    pub fn update(&mut self, dt: f32) {
        if self.hit_pulse > 0.0 {
            self.hit_pulse = (self.hit_pulse - dt / HIT_PULSE_DURATION).max(0.0);
        }
    }

    /// Spend a grenade if one is available
    pub fn take_grenade(&mut self) -> bool {
        if self.grenades == 0 {
            return false;
        }
        self.grenades -= 1;
        true
    }
}
