//! Straight-line projectiles (player rounds and thrown objects)

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Special behavior on impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    #[default]
    Standard,
    /// Keeps flying after a hit and may strike several actors
    Piercing,
    /// Detonates on the first actor struck, killing everything nearby
    Explosive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Where the projectile was launched from
    pub origin: Vec3,
    /// Aim point, if it was fired at something
    pub target: Option<Vec3>,
    pub kind: ProjectileKind,
    /// Damage dealt on a standard hit
    pub damage: f32,
    /// Distance from origin after which the projectile is discarded
    pub max_travel: f32,
    /// Flagged for removal after collision handling
    pub remove: bool,
    /// Actor ids already struck (piercing rounds never hit the same actor twice)
    #[serde(default)]
    pub struck: Vec<u32>,
}

impl Projectile {
    /// Launch from `origin` toward `target` at `speed`
    pub fn aimed(
        origin: Vec3,
        target: Vec3,
        speed: f32,
        kind: ProjectileKind,
        damage: f32,
    ) -> Self {
        let dir = (target - origin).normalize_or_zero();
        Self {
            pos: origin,
            vel: dir * speed,
            origin,
            target: Some(target),
            kind,
            damage,
            max_travel: origin.distance(target),
            remove: false,
            struck: Vec::new(),
        }
    }

    /// Advance by `dt`; flags removal once past `max_travel`
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        if self.traveled() > self.max_travel {
            self.remove = true;
        }
    }

    pub fn traveled(&self) -> f32 {
        self.pos.distance(self.origin)
    }

    pub fn has_struck(&self, id: u32) -> bool {
        self.struck.contains(&id)
    }

    pub fn record_strike(&mut self, id: u32) {
        if !self.has_struck(id) {
            self.struck.push(id);
        }
    }

    pub fn is_piercing(&self) -> bool {
        self.kind == ProjectileKind::Piercing
    }

    pub fn is_explosive(&self) -> bool {
        self.kind == ProjectileKind::Explosive
    }
}
