//! Hostile actors
//!
//! One record type for every variant. The shared lifecycle is
//! Alive -> Dying -> purged, or Alive -> Escaping -> purged; the variant
//! phase machines in `behavior.rs` only run while the actor is alive.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::behavior::{self, Behavior};
use super::context::SimContext;
use super::events::{Award, GameEvent};
use super::player::Player;
use crate::consts::*;

/// Behavior variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    /// Struts, then charges at a multiple of its speed
    Charger,
    /// Ranged attacker
    Thrower,
    /// Periodically warps to a new lateral position
    Teleporter,
    /// Grows faster and bigger with every hit
    Inflater,
    /// Talking thrower that drops extra money
    Vendor,
    /// Harmless lateral crosser with a random reward
    Bonus,
}

/// Spawn-time stats for a variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindStats {
    pub health: f32,
    pub speed: f32,
    pub points: u32,
    pub bonus_points: u32,
    pub money: u32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 7] = [
        EnemyKind::Normal,
        EnemyKind::Charger,
        EnemyKind::Thrower,
        EnemyKind::Teleporter,
        EnemyKind::Inflater,
        EnemyKind::Vendor,
        EnemyKind::Bonus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Normal => "Normal",
            EnemyKind::Charger => "Charger",
            EnemyKind::Thrower => "Thrower",
            EnemyKind::Teleporter => "Teleporter",
            EnemyKind::Inflater => "Inflater",
            EnemyKind::Vendor => "Vendor",
            EnemyKind::Bonus => "Bonus",
        }
    }

    pub fn stats(&self) -> KindStats {
        let (health, speed, points, bonus_points, money) = match self {
            EnemyKind::Normal => (2.0, 40.0, 100, 50, 10),
            EnemyKind::Charger => (3.0, 30.0, 150, 100, 15),
            EnemyKind::Thrower => (2.0, 30.0, 150, 75, 15),
            EnemyKind::Teleporter => (2.0, 35.0, 200, 100, 20),
            EnemyKind::Inflater => (4.0, 25.0, 200, 100, 20),
            EnemyKind::Vendor => (3.0, 25.0, 250, 100, 40),
            EnemyKind::Bonus => (1.0, 50.0, 0, 0, 0),
        };
        KindStats {
            health,
            speed,
            points,
            bonus_points,
            money,
        }
    }

    /// Crossers can't reach the defense line
    pub fn is_threat(&self) -> bool {
        *self != EnemyKind::Bonus
    }
}

/// Shared lifecycle; the variants make the three states mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Lifecycle {
    Alive,
    Dying { elapsed: f32 },
    Escaping,
}

/// Health meter coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterBand {
    Healthy,
    Wounded,
    Critical,
}

/// Result of a projectile strike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Hurt,
    Killed,
    /// Actor was not alive
    Ignored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub position: Vec3,
    health: f32,
    /// Health at spawn (for meter thresholds)
    pub starting_health: f32,
    /// Signed speed along the travel axis
    pub speed: f32,
    /// Speed at spawn
    pub base_speed: f32,
    lifecycle: Lifecycle,
    /// Set on the first hit; engagement time accrues from then on
    pub engaged: bool,
    pub engagement_time: f32,
    pub hits_taken: u32,
    pub points: u32,
    pub bonus_points: u32,
    pub money: u32,
    /// Score credited by the kill handler
    pub score_awarded: u32,
    /// Killed point-blank
    pub close_call: bool,
    /// Visual scale (also widens the hit interval)
    pub scale: f32,
    /// Lighting multiplier; an explosion burns it to 0
    pub lighting: f32,
    /// Animation playback rate for this tick
    pub anim_rate: f32,
    /// Spawn lane held by this actor
    pub lane: Option<usize>,
    pub behavior: Behavior,
}

impl Enemy {
    /// A fresh actor of `kind` at `position`
    pub fn spawn(id: u32, kind: EnemyKind, position: Vec3, ctx: &mut SimContext) -> Self {
        let stats = kind.stats();
        let behavior = Behavior::for_kind(kind, ctx);
        let mut position = position;
        if let Some(direction) = behavior.crossing_direction() {
            position.x = -direction * LATERAL_BOUNDARY;
        }
        let speed = stats.speed * ctx.difficulty.speed_multiplier();
        Self {
            id,
            kind,
            position,
            health: stats.health,
            starting_health: stats.health,
            speed,
            base_speed: speed,
            lifecycle: Lifecycle::Alive,
            engaged: false,
            engagement_time: 0.0,
            hits_taken: 0,
            points: stats.points,
            bonus_points: stats.bonus_points,
            money: stats.money,
            score_awarded: 0,
            close_call: false,
            scale: 1.0,
            lighting: 1.0,
            anim_rate: ctx.time_scale(),
            lane: None,
            behavior,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_alive(&self) -> bool {
        self.lifecycle == Lifecycle::Alive
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Dying { .. })
    }

    pub fn is_escaping(&self) -> bool {
        self.lifecycle == Lifecycle::Escaping
    }

    /// Alive and not mid-warp
    pub fn is_targetable(&self) -> bool {
        self.is_alive() && self.behavior.targetable()
    }

    /// Lateral half-width of the hit interval
    pub fn half_width(&self) -> f32 {
        ENEMY_HALF_WIDTH * self.scale
    }

    /// Yaw the actor faces, derived from its direction of travel
    pub fn facing(&self) -> f32 {
        match self.behavior.crossing_direction() {
            Some(direction) if direction > 0.0 => std::f32::consts::FRAC_PI_2,
            Some(_) => -std::f32::consts::FRAC_PI_2,
            None => std::f32::consts::PI,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.behavior.opacity()
    }

    pub fn meter_band(&self) -> MeterBand {
        let fraction = if self.starting_health > 0.0 {
            self.health / self.starting_health
        } else {
            0.0
        };
        if fraction > 2.0 / 3.0 {
            MeterBand::Healthy
        } else if fraction > 1.0 / 3.0 {
            MeterBand::Wounded
        } else {
            MeterBand::Critical
        }
    }

    /// Seconds spent dying (0 unless dying)
    pub fn dying_time(&self) -> f32 {
        match self.lifecycle {
            Lifecycle::Dying { elapsed } => elapsed,
            _ => 0.0,
        }
    }

    fn distance_to(&self, player_pos: Option<Vec3>) -> f32 {
        match player_pos {
            Some(pos) => self.position.distance(pos),
            None => self.position.z - PLAYER_DEPTH,
        }
    }

    /// Apply a weapon strike
    ///
    /// Point-blank strikes (closer than `POINT_BLANK_DISTANCE` to the player)
    /// deal double damage and always kill.
    pub fn on_hit(
        &mut self,
        damage: f32,
        player_pos: Option<Vec3>,
        ctx: &mut SimContext,
    ) -> HitOutcome {
        if !self.is_alive() {
            return HitOutcome::Ignored;
        }
        self.engaged = true;
        self.hits_taken += 1;
        self.health -= damage;

        let distance = self.distance_to(player_pos);
        if player_pos.is_some() && distance < POINT_BLANK_DISTANCE {
            // Double damage, then forced to exactly zero
            self.health = 0.0;
            self.close_call = true;
        }

        if self.health <= 0.0 {
            self.kill(distance, ctx);
            return HitOutcome::Killed;
        }

        behavior::on_hurt(self);
        ctx.emit(GameEvent::Hurt { id: self.id });
        HitOutcome::Hurt
    }

    /// Kill outright (splash damage); no-op unless alive
    pub fn force_kill(&mut self, player_pos: Option<Vec3>, ctx: &mut SimContext) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = 0.0;
        let distance = self.distance_to(player_pos);
        self.kill(distance, ctx);
        true
    }

    /// Common kill handler: score, awards, death trigger
    fn kill(&mut self, distance: f32, ctx: &mut SimContext) {
        behavior::on_killed(self, ctx);

        self.score_awarded = if self.kind.is_threat() {
            let bonus = (self.bonus_points as f32 * distance.max(0.0) / SPAWN_DEPTH).round();
            ((self.points as f32 + bonus) * ctx.difficulty.score_multiplier()).round() as u32
        } else {
            0
        };
        if self.close_call {
            ctx.grant(Award::CloseCall);
        }
        self.lifecycle = Lifecycle::Dying { elapsed: 0.0 };
        self.anim_rate = ctx.time_scale();
        log::debug!(
            "{} {} killed at {:.1} for {} points",
            self.kind.as_str(),
            self.id,
            distance,
            self.score_awarded
        );
        ctx.emit(GameEvent::Killed {
            id: self.id,
            kind: self.kind,
            score: self.score_awarded,
        });
    }

    /// Contact with the player at the defense line
    pub fn on_collide(&self, player: &mut Player) -> bool {
        player.take_damage(1)
    }

    /// Crossed the defense line alive; no-op otherwise
    pub fn on_escaped(&mut self, ctx: &mut SimContext) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.behavior.abandon();
        self.lifecycle = Lifecycle::Escaping;
        if self.kind.is_threat() {
            log::debug!("{} {} escaped", self.kind.as_str(), self.id);
            ctx.emit(GameEvent::Escaped { id: self.id });
            ctx.emit(GameEvent::EscapeWarning);
        }
        true
    }

    /// Walked off the far end with nobody defending; no escape cues
    pub(crate) fn depart(&mut self) {
        self.behavior.abandon();
        self.lifecycle = Lifecycle::Escaping;
    }

    /// Reached the player's depth while alive
    pub fn reached_player(&self, player_depth: f32) -> bool {
        self.is_alive() && self.kind.is_threat() && self.position.z <= player_depth
    }

    /// Crosser has left the field sideways
    pub fn crossed_out(&self) -> bool {
        !self.kind.is_threat() && self.position.x.abs() > LATERAL_BOUNDARY
    }

    /// Ready to be dropped from memory
    pub fn is_purgeable(&self) -> bool {
        match self.lifecycle {
            Lifecycle::Alive => false,
            Lifecycle::Dying { elapsed } => elapsed > DYING_DURATION,
            Lifecycle::Escaping => {
                if self.kind.is_threat() {
                    self.position.z < ESCAPE_DEPTH
                } else {
                    self.position.x.abs() > LATERAL_BOUNDARY
                }
            }
        }
    }

    /// Per-tick update; `dt` is already slow-motion scaled
    pub fn update(&mut self, player: Option<&mut Player>, ctx: &mut SimContext, dt: f32) {
        if let Lifecycle::Dying { elapsed } = &mut self.lifecycle {
            *elapsed += dt;
            return;
        }
        if self.is_escaping() {
            let step = self.speed / SPEED_NORMALIZATION * dt;
            match self.behavior.crossing_direction() {
                Some(direction) => self.position.x += direction * step,
                None => self.position.z -= step,
            }
            return;
        }

        self.anim_rate = behavior::time_dilation(self, ctx);
        behavior::advance(self, player, ctx, dt);
        if self.engaged {
            self.engagement_time += dt;
        }
    }
}
