//! Per-variant phase machines
//!
//! Every actor shares the lifecycle in `enemy.rs`; the variant-specific state
//! lives in [`Behavior`] and is driven by the free functions here, dispatched
//! on the tag. Only alive actors are ever advanced through these.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{overshot, point_in_sphere};
use super::context::SimContext;
use super::enemy::{Enemy, EnemyKind};
use super::events::{Award, GameEvent};
use super::player::Player;
use super::projectile::{Projectile, ProjectileKind};
use crate::consts::*;

/// Teleporter: countdown to next warp (seconds)
pub const WARP_COUNTDOWN_RANGE: (f32, f32) = (3.0, 6.0);
/// Teleporter: seconds of warning before vanishing
pub const WARP_TELL_TIME: f32 = 1.0;
/// Teleporter: seconds spent invisible after relocating
pub const WARP_INVISIBLE_TIME: f32 = 0.4;
/// Teleporter: seconds to fade back in
pub const WARP_FADE_IN_TIME: f32 = 0.5;

/// Throwers: seconds between throws
pub const THROW_COOLDOWN_RANGE: (f32, f32) = (2.5, 5.0);
/// Throwers: the player must be at least this far away
pub const MIN_THROW_DISTANCE: f32 = 15.0;
/// Throwers: seconds from starting the throw until release
pub const THROW_WINDUP: f32 = 0.4;
/// Throwers: total seconds movement is suspended for a throw
pub const THROW_DURATION: f32 = 0.8;
pub const THROW_SPEED: f32 = 12.0;
/// Release point above the thrower's feet
pub const THROW_HAND_HEIGHT: f32 = 1.6;

/// Vendor: seconds between barks
pub const TALK_INTERVAL_RANGE: (f32, f32) = (3.0, 7.0);

/// Inflater growth per non-lethal hit
pub const INFLATE_SPEED_FACTOR: f32 = 1.15;
pub const INFLATE_SCALE_FACTOR: f32 = 1.25;
pub const INFLATE_MAX_SCALE: f32 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargePhase {
    Strutting,
    Charging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarpPhase {
    Walking,
    /// Tell before vanishing (still hittable)
    Disappearing,
    /// Relocated and untargetable
    Invisible,
    /// Fading back in at the new spot
    Reappearing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThrowPhase {
    Walking,
    /// Movement suspended; the projectile leaves after the windup
    Throwing { elapsed: f32, released: bool },
}

/// Ranged-attack state shared by throwers and vendors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thrower {
    pub cooldown: f32,
    pub phase: ThrowPhase,
    /// Self-owned projectiles in flight toward the player
    pub projectiles: Vec<Projectile>,
}

impl Thrower {
    fn new(ctx: &mut SimContext) -> Self {
        Self {
            cooldown: ctx.range(THROW_COOLDOWN_RANGE.0, THROW_COOLDOWN_RANGE.1),
            phase: ThrowPhase::Walking,
            projectiles: Vec::new(),
        }
    }

    fn is_throwing(&self) -> bool {
        matches!(self.phase, ThrowPhase::Throwing { .. })
    }
}

/// Variant-specific state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Behavior {
    Walker,
    Charger {
        phase: ChargePhase,
        countdown: f32,
    },
    Teleporter {
        phase: WarpPhase,
        /// Seconds until the next warp
        countdown: f32,
        /// Seconds spent in the current invisible/reappearing phase
        phase_timer: f32,
        /// Completed warp cycles
        warps: u32,
        /// Vanished this tick and waiting for the coordinator to pick a new lane
        relocating: bool,
    },
    Thrower(Thrower),
    Vendor {
        thrower: Thrower,
        talk_timer: f32,
    },
    Inflater {
        growths: u32,
    },
    Crosser {
        /// +1 moves toward +x, -1 toward -x
        direction: f32,
    },
}

impl Behavior {
    /// Fresh variant state for a newly spawned actor
    pub fn for_kind(kind: EnemyKind, ctx: &mut SimContext) -> Self {
        match kind {
            EnemyKind::Normal => Behavior::Walker,
            EnemyKind::Charger => {
                let (min, max) = ctx.difficulty.charge_countdown_range();
                Behavior::Charger {
                    phase: ChargePhase::Strutting,
                    countdown: ctx.range(min, max),
                }
            }
            EnemyKind::Teleporter => Behavior::Teleporter {
                phase: WarpPhase::Walking,
                countdown: ctx.range(WARP_COUNTDOWN_RANGE.0, WARP_COUNTDOWN_RANGE.1),
                phase_timer: 0.0,
                warps: 0,
                relocating: false,
            },
            EnemyKind::Thrower => Behavior::Thrower(Thrower::new(ctx)),
            EnemyKind::Vendor => Behavior::Vendor {
                thrower: Thrower::new(ctx),
                talk_timer: ctx.range(TALK_INTERVAL_RANGE.0, TALK_INTERVAL_RANGE.1),
            },
            EnemyKind::Inflater => Behavior::Inflater { growths: 0 },
            EnemyKind::Bonus => Behavior::Crosser {
                direction: if ctx.range(0.0, 1.0) < 0.5 { 1.0 } else { -1.0 },
            },
        }
    }

    /// Whether the actor walks this tick
    pub fn moves(&self) -> bool {
        match self {
            Behavior::Teleporter { phase, .. } => {
                matches!(phase, WarpPhase::Walking | WarpPhase::Disappearing)
            }
            Behavior::Thrower(thrower) | Behavior::Vendor { thrower, .. } => !thrower.is_throwing(),
            _ => true,
        }
    }

    /// Whether player fire can connect
    pub fn targetable(&self) -> bool {
        !matches!(
            self,
            Behavior::Teleporter {
                phase: WarpPhase::Invisible,
                ..
            }
        )
    }

    /// Visibility for the presentation layer (0 = gone, 1 = solid)
    pub fn opacity(&self) -> f32 {
        match self {
            Behavior::Teleporter {
                phase, phase_timer, ..
            } => match phase {
                WarpPhase::Walking | WarpPhase::Disappearing => 1.0,
                WarpPhase::Invisible => 0.0,
                WarpPhase::Reappearing => (phase_timer / WARP_FADE_IN_TIME).clamp(0.0, 1.0),
            },
            _ => 1.0,
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        match self {
            Behavior::Thrower(thrower) | Behavior::Vendor { thrower, .. } => &thrower.projectiles,
            _ => &[],
        }
    }

    /// Lateral direction of travel for crossers
    pub fn crossing_direction(&self) -> Option<f32> {
        match self {
            Behavior::Crosser { direction } => Some(*direction),
            _ => None,
        }
    }

    /// Clear and report a pending warp relocation
    pub(crate) fn take_relocation(&mut self) -> bool {
        match self {
            Behavior::Teleporter { relocating, .. } => std::mem::take(relocating),
            _ => false,
        }
    }

    /// Drop in-flight sub-phases when the actor leaves the alive state
    pub fn abandon(&mut self) {
        if let Behavior::Thrower(thrower) | Behavior::Vendor { thrower, .. } = self {
            thrower.projectiles.clear();
            thrower.phase = ThrowPhase::Walking;
        }
    }
}

/// Animation time-dilation for this tick, from speed, phase and slow motion
pub fn time_dilation(enemy: &Enemy, ctx: &SimContext) -> f32 {
    if !enemy.behavior.targetable() {
        return 0.0;
    }
    if !enemy.behavior.moves() || enemy.base_speed <= 0.0 {
        return ctx.time_scale();
    }
    ctx.time_scale() * (enemy.speed / enemy.base_speed)
}

/// Advance the variant phase machine and move the actor
///
/// `dt` is already slow-motion scaled.
pub fn advance(enemy: &mut Enemy, player: Option<&mut Player>, ctx: &mut SimContext, dt: f32) {
    let id = enemy.id;
    match &mut enemy.behavior {
        Behavior::Walker | Behavior::Inflater { .. } | Behavior::Crosser { .. } => {}
        Behavior::Charger { phase, countdown } => {
            if *phase == ChargePhase::Strutting {
                *countdown -= dt;
                if *countdown <= 0.0 {
                    *countdown = 0.0;
                    *phase = ChargePhase::Charging;
                    enemy.speed *= ctx.difficulty.charge_factor();
                    log::debug!("charger {} charging at speed {:.1}", id, enemy.speed);
                    ctx.emit(GameEvent::ChargeStarted { id });
                }
            }
        }
        Behavior::Teleporter {
            phase,
            countdown,
            phase_timer,
            warps,
            relocating,
        } => match phase {
            WarpPhase::Walking | WarpPhase::Disappearing => {
                *countdown -= dt;
                if *countdown <= 0.0 {
                    // Untargetable from here on; the new lane is picked this same tick
                    *phase = WarpPhase::Invisible;
                    *phase_timer = 0.0;
                    *relocating = true;
                } else if *phase == WarpPhase::Walking && *countdown <= WARP_TELL_TIME {
                    *phase = WarpPhase::Disappearing;
                    ctx.emit(GameEvent::WarpTell { id });
                }
            }
            WarpPhase::Invisible => {
                *phase_timer += dt;
                if *phase_timer >= WARP_INVISIBLE_TIME {
                    *phase = WarpPhase::Reappearing;
                    *phase_timer = 0.0;
                }
            }
            WarpPhase::Reappearing => {
                *phase_timer += dt;
                if *phase_timer >= WARP_FADE_IN_TIME {
                    *phase = WarpPhase::Walking;
                    *phase_timer = 0.0;
                    *countdown = ctx.range(WARP_COUNTDOWN_RANGE.0, WARP_COUNTDOWN_RANGE.1);
                    *warps += 1;
                    ctx.emit(GameEvent::Reappeared { id });
                }
            }
        },
        Behavior::Thrower(thrower) => {
            advance_thrower(thrower, id, enemy.position, player, ctx, dt);
        }
        Behavior::Vendor {
            thrower,
            talk_timer,
        } => {
            *talk_timer -= dt;
            if *talk_timer <= 0.0 {
                *talk_timer = ctx.range(TALK_INTERVAL_RANGE.0, TALK_INTERVAL_RANGE.1);
                ctx.emit(GameEvent::Talk { id });
            }
            advance_thrower(thrower, id, enemy.position, player, ctx, dt);
        }
    }

    if enemy.behavior.moves() {
        let step = enemy.speed / SPEED_NORMALIZATION * dt;
        match enemy.behavior.crossing_direction() {
            Some(direction) => enemy.position.x += direction * step,
            None => enemy.position.z -= step,
        }
    }
}

/// Throw cadence plus the self-owned projectile list
fn advance_thrower(
    thrower: &mut Thrower,
    id: u32,
    position: Vec3,
    mut player: Option<&mut Player>,
    ctx: &mut SimContext,
    dt: f32,
) {
    let target = player.as_deref().filter(|p| p.alive).map(|p| p.position);

    match thrower.phase {
        ThrowPhase::Walking => {
            thrower.cooldown = (thrower.cooldown - dt).max(0.0);
            let in_range = target.is_some_and(|t| position.distance(t) > MIN_THROW_DISTANCE);
            if thrower.cooldown <= 0.0 && in_range {
                thrower.phase = ThrowPhase::Throwing {
                    elapsed: 0.0,
                    released: false,
                };
            }
        }
        ThrowPhase::Throwing {
            ref mut elapsed,
            ref mut released,
        } => {
            *elapsed += dt;
            if !*released && *elapsed >= THROW_WINDUP {
                *released = true;
                if let Some(target) = target {
                    let hand = position + Vec3::new(0.0, THROW_HAND_HEIGHT, 0.0);
                    let mut projectile =
                        Projectile::aimed(hand, target, THROW_SPEED, ProjectileKind::Standard, 1.0);
                    // Let it fly past the aim point so the overshoot check can discard it
                    projectile.max_travel *= 1.5;
                    thrower.projectiles.push(projectile);
                    ctx.emit(GameEvent::Thrown { id });
                }
            }
            if *elapsed >= THROW_DURATION {
                thrower.phase = ThrowPhase::Walking;
                thrower.cooldown = ctx.range(THROW_COOLDOWN_RANGE.0, THROW_COOLDOWN_RANGE.1);
            }
        }
    }

    for projectile in &mut thrower.projectiles {
        projectile.advance(dt);
        let Some(player) = player.as_deref_mut() else {
            continue;
        };
        if !player.alive {
            continue;
        }
        if point_in_sphere(projectile.pos, player.position, PLAYER_HIT_RADIUS) {
            projectile.remove = true;
            player.take_damage(1);
            log::debug!("thrower {} hit player, health {}", id, player.health);
            ctx.emit(GameEvent::PlayerHit {
                health: player.health,
            });
        } else if overshot(projectile.pos, player.position.z) {
            projectile.remove = true;
        }
    }
    thrower.projectiles.retain(|p| !p.remove);
}

/// Growth applied when an actor survives a hit
pub fn on_hurt(enemy: &mut Enemy) {
    if let Behavior::Inflater { growths } = &mut enemy.behavior {
        *growths += 1;
        enemy.speed *= INFLATE_SPEED_FACTOR;
        enemy.scale = (enemy.scale * INFLATE_SCALE_FACTOR).min(INFLATE_MAX_SCALE);
    }
}

/// Variant awards on death
pub fn on_killed(enemy: &mut Enemy, ctx: &mut SimContext) {
    match &enemy.behavior {
        Behavior::Charger {
            phase: ChargePhase::Strutting,
            ..
        } => ctx.grant(Award::StoppedCharger),
        Behavior::Teleporter { warps: 0, .. } => ctx.grant(Award::StoppedTeleporter),
        _ => {}
    }
    enemy.behavior.abandon();
}
