//! The player's gun: firing cadence, clip/reserve bookkeeping and reloads
//!
//! Reloading hosts the active-reload minigame. While a reload runs, an
//! indicator sweeps 0..100 and back; pressing reload again registers a single
//! attempt. Landing within half the success area of the center (50) finishes
//! the reload on the spot. A miss freezes the indicator where it landed and
//! the reload finishes passively when its full duration elapses.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::context::SimContext;
use super::events::GameEvent;
use super::player::Player;
use super::projectile::{Projectile, ProjectileKind};
use super::upgrades::{PurchaseOutcome, UpgradeKind, UpgradeLevels};

/// Seconds for the indicator to sweep 0 -> 100 -> 0
pub const ACTIVE_RELOAD_PERIOD: f32 = 1.0;
/// Indicator value the success area is centered on
pub const ACTIVE_RELOAD_CENTER: f32 = 50.0;
/// Price of one clip's worth of reserve ammunition
pub const AMMO_PRICE: u32 = 25;

/// Static weapon tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub base_damage: f32,
    pub damage_per_level: f32,
    /// Shots per second
    pub base_rate_of_fire: f32,
    pub rate_per_level: f32,
    pub base_clip_size: u32,
    pub clip_per_level: u32,
    /// Seconds for a passive reload
    pub base_reload_time: f32,
    pub reload_time_per_level: f32,
    pub min_reload_time: f32,
    /// Width of the active-reload success area (indicator units)
    pub base_reload_area: f32,
    pub reload_area_per_level: f32,
    pub max_reserve: u32,
    pub projectile_speed: f32,
    pub max_range: f32,
    /// Muzzle position relative to the player's eye
    pub muzzle_offset: Vec3,
    pub ammo_kind: ProjectileKind,
    /// Firing never consumes the clip
    pub infinite_clip: bool,
    /// Reloading never consumes the reserve
    pub infinite_ammo: bool,
    /// Start reloading as soon as the last round leaves the clip
    pub auto_reload: bool,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            base_damage: 1.0,
            damage_per_level: 0.5,
            base_rate_of_fire: 4.0,
            rate_per_level: 1.0,
            base_clip_size: 8,
            clip_per_level: 2,
            base_reload_time: 2.0,
            reload_time_per_level: 0.25,
            min_reload_time: 0.5,
            base_reload_area: 20.0,
            reload_area_per_level: 5.0,
            max_reserve: 240,
            projectile_speed: 80.0,
            max_range: 80.0,
            muzzle_offset: Vec3::new(0.3, -0.1, 0.5),
            ammo_kind: ProjectileKind::Standard,
            infinite_clip: false,
            infinite_ammo: false,
            auto_reload: true,
        }
    }
}

/// Vertical (pitch) and lateral (yaw) aim angles in radians
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    pub pitch: f32,
    pub yaw: f32,
}

/// Active-reload attempt for the current reload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReloadAttempt {
    #[default]
    None,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReloadState {
    pub reloading: bool,
    /// Seconds since the reload began
    pub elapsed: f32,
    /// Active-reload indicator (0..100)
    pub indicator: f32,
    pub attempt: ReloadAttempt,
}

impl ReloadState {
    pub fn attempt_made(&self) -> bool {
        self.attempt != ReloadAttempt::None
    }
}

/// Result of pulling the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired,
    /// Fire interval has not elapsed
    Cooldown,
    Reloading,
    Empty,
}

/// Result of pressing reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Started,
    AlreadyReloading,
    ClipFull,
    NoReserve,
    ActiveSuccess,
    ActiveFailed,
    /// The one attempt for this reload was already used
    AttemptSpent,
}

/// Indicator position after `elapsed` seconds of reloading
#[inline]
pub fn indicator_at(elapsed: f32) -> f32 {
    ACTIVE_RELOAD_CENTER - ACTIVE_RELOAD_CENTER * (TAU * elapsed / ACTIVE_RELOAD_PERIOD).cos()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub config: WeaponConfig,
    pub upgrades: UpgradeLevels,
    pub ammo_in_clip: u32,
    pub reserve: u32,
    /// Seconds since the last shot
    pub since_last_shot: f32,
    pub reload: ReloadState,
    /// Rounds in flight
    pub projectiles: Vec<Projectile>,
    pub shots_fired: u32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new(WeaponConfig::default(), 64)
    }
}

impl Weapon {
    /// Weapon with a full clip and `reserve` spare rounds
    pub fn new(config: WeaponConfig, reserve: u32) -> Self {
        let mut weapon = Self {
            config,
            upgrades: UpgradeLevels::default(),
            ammo_in_clip: 0,
            reserve: 0,
            since_last_shot: f32::MAX,
            reload: ReloadState::default(),
            projectiles: Vec::new(),
            shots_fired: 0,
        };
        weapon.ammo_in_clip = weapon.clip_size();
        weapon.reserve = reserve.min(weapon.config.max_reserve);
        weapon
    }

    pub fn damage(&self) -> f32 {
        self.config.base_damage + self.upgrades.damage as f32 * self.config.damage_per_level
    }

    pub fn rate_of_fire(&self) -> f32 {
        self.config.base_rate_of_fire
            + self.upgrades.rate_of_fire as f32 * self.config.rate_per_level
    }

    /// Minimum seconds between shots
    pub fn fire_interval(&self) -> f32 {
        1.0 / self.rate_of_fire().max(f32::EPSILON)
    }

    pub fn clip_size(&self) -> u32 {
        self.config.base_clip_size + self.upgrades.clip_size as u32 * self.config.clip_per_level
    }

    pub fn reload_duration(&self) -> f32 {
        (self.config.base_reload_time
            - self.upgrades.reload_speed as f32 * self.config.reload_time_per_level)
            .max(self.config.min_reload_time)
    }

    pub fn reload_area(&self) -> f32 {
        self.config.base_reload_area
            + self.upgrades.reload_area as f32 * self.config.reload_area_per_level
    }

    /// Indicator range that counts as a successful active reload
    pub fn success_bounds(&self) -> (f32, f32) {
        let half = self.reload_area() / 2.0;
        (
            (ACTIVE_RELOAD_CENTER - half).max(0.0),
            (ACTIVE_RELOAD_CENTER + half).min(100.0),
        )
    }

    pub fn is_reloading(&self) -> bool {
        self.reload.reloading
    }

    fn has_reserve(&self) -> bool {
        self.config.infinite_ammo || self.reserve > 0
    }

    /// Check whether a shot could go out right now
    pub fn check_fire(&self) -> FireOutcome {
        if self.reload.reloading {
            FireOutcome::Reloading
        } else if self.ammo_in_clip == 0 {
            FireOutcome::Empty
        } else if self.since_last_shot < self.fire_interval() {
            FireOutcome::Cooldown
        } else {
            FireOutcome::Fired
        }
    }

    /// Pull the trigger from the player's eye position
    pub fn fire(&mut self, eye: Vec3, aim: Aim, ctx: &mut SimContext) -> FireOutcome {
        let outcome = self.check_fire();
        match outcome {
            FireOutcome::Fired => {}
            FireOutcome::Empty | FireOutcome::Reloading => {
                ctx.emit(GameEvent::EmptyClip);
                return outcome;
            }
            FireOutcome::Cooldown => {
                ctx.emit(GameEvent::FireCooldown);
                return outcome;
            }
        }

        if !self.config.infinite_clip {
            self.ammo_in_clip -= 1;
        }
        let projectile = self.spawn_projectile(eye, aim, self.config.ammo_kind);
        self.projectiles.push(projectile);
        self.since_last_shot = 0.0;
        self.shots_fired += 1;
        ctx.emit(GameEvent::ShotFired);

        if self.ammo_in_clip == 0 && self.has_reserve() && self.config.auto_reload {
            self.start_reload(ctx);
        }
        FireOutcome::Fired
    }

    /// Lob one of the player's grenades (ignores clip and reload state)
    pub fn launch_grenade(&mut self, player: &mut Player, aim: Aim, ctx: &mut SimContext) -> bool {
        if !player.alive || !player.take_grenade() {
            ctx.emit(GameEvent::EmptyClip);
            return false;
        }
        let projectile = self.spawn_projectile(player.position, aim, ProjectileKind::Explosive);
        self.projectiles.push(projectile);
        self.shots_fired += 1;
        ctx.emit(GameEvent::ShotFired);
        true
    }

    /// Muzzle offset plus max range along depth, bent by the aim angles
    fn spawn_projectile(&self, eye: Vec3, aim: Aim, kind: ProjectileKind) -> Projectile {
        let origin = eye + self.config.muzzle_offset;
        let range = self.config.max_range;
        let target = origin + Vec3::new(aim.yaw.tan() * range, aim.pitch.tan() * range, range);
        Projectile::aimed(origin, target, self.config.projectile_speed, kind, self.damage())
    }

    /// Begin a reload; a no-op while one is already running
    pub fn start_reload(&mut self, ctx: &mut SimContext) -> ReloadOutcome {
        if self.reload.reloading {
            return ReloadOutcome::AlreadyReloading;
        }
        if self.ammo_in_clip >= self.clip_size() {
            return ReloadOutcome::ClipFull;
        }
        if !self.has_reserve() {
            ctx.emit(GameEvent::EmptyClip);
            return ReloadOutcome::NoReserve;
        }
        self.reload = ReloadState {
            reloading: true,
            elapsed: 0.0,
            indicator: indicator_at(0.0),
            attempt: ReloadAttempt::None,
        };
        ctx.emit(GameEvent::ReloadStarted);
        ReloadOutcome::Started
    }

    /// Reload button: starts a reload, or makes the active-reload attempt
    pub fn press_reload(&mut self, ctx: &mut SimContext) -> ReloadOutcome {
        if self.reload.reloading {
            self.attempt_active_reload(ctx)
        } else {
            self.start_reload(ctx)
        }
    }

    /// Register the single active-reload attempt at the current indicator
    pub fn attempt_active_reload(&mut self, ctx: &mut SimContext) -> ReloadOutcome {
        if !self.reload.reloading {
            return self.start_reload(ctx);
        }
        if self.reload.attempt_made() {
            return ReloadOutcome::AttemptSpent;
        }
        let distance = (self.reload.indicator - ACTIVE_RELOAD_CENTER).abs();
        if distance <= self.reload_area() / 2.0 {
            self.reload.attempt = ReloadAttempt::Succeeded;
            log::debug!("active reload hit at {:.1}", self.reload.indicator);
            ctx.emit(GameEvent::ActiveReloadSuccess);
            self.complete_reload(ctx);
            ReloadOutcome::ActiveSuccess
        } else {
            self.reload.attempt = ReloadAttempt::Failed;
            log::debug!("active reload missed at {:.1}", self.reload.indicator);
            ctx.emit(GameEvent::ActiveReloadFailed);
            ReloadOutcome::ActiveFailed
        }
    }

    /// Move rounds from reserve into the clip and leave the reloading state
    fn complete_reload(&mut self, ctx: &mut SimContext) {
        let shortfall = self.clip_size().saturating_sub(self.ammo_in_clip);
        let transfer = if self.config.infinite_ammo {
            shortfall
        } else {
            shortfall.min(self.reserve)
        };
        self.ammo_in_clip += transfer;
        if !self.config.infinite_ammo {
            self.reserve = self.reserve.saturating_sub(transfer);
        }
        self.reload = ReloadState {
            indicator: self.reload.indicator,
            ..ReloadState::default()
        };
        ctx.emit(GameEvent::ReloadComplete);
    }

    /// Advance cadence and reload timers and move rounds in flight
    ///
    /// `dt` is already slow-motion scaled.
    pub fn update(&mut self, dt: f32, ctx: &mut SimContext) {
        self.since_last_shot += dt;

        if self.reload.reloading {
            self.reload.elapsed += dt;
            if !self.reload.attempt_made() {
                self.reload.indicator = indicator_at(self.reload.elapsed);
            }
            if self.reload.elapsed >= self.reload_duration() {
                self.complete_reload(ctx);
            }
        }

        for projectile in &mut self.projectiles {
            projectile.advance(dt);
        }
        self.projectiles.retain(|p| !p.remove);
    }

    /// Drop rounds flagged during collision handling
    pub fn purge_projectiles(&mut self) {
        self.projectiles.retain(|p| !p.remove);
    }

    /// Buy the next upgrade level of `kind`
    pub fn purchase(
        &mut self,
        kind: UpgradeKind,
        currency: &mut u32,
        ctx: &mut SimContext,
    ) -> PurchaseOutcome {
        let outcome = self.upgrades.purchase(kind, currency);
        match outcome {
            PurchaseOutcome::Purchased { level, price } => {
                log::debug!("upgraded {} to level {} for {}", kind.as_str(), level, price);
                ctx.emit(GameEvent::UpgradePurchased { kind, level });
            }
            _ => ctx.emit(GameEvent::PurchaseRejected),
        }
        outcome
    }

    /// Buy one clip's worth of reserve ammunition
    pub fn buy_ammo(&mut self, currency: &mut u32, ctx: &mut SimContext) -> PurchaseOutcome {
        let room = self.config.max_reserve.saturating_sub(self.reserve);
        let outcome = if room == 0 {
            PurchaseOutcome::NotNeeded
        } else if *currency < AMMO_PRICE {
            PurchaseOutcome::InsufficientFunds { price: AMMO_PRICE }
        } else {
            let amount = self.clip_size().min(room);
            *currency -= AMMO_PRICE;
            self.reserve += amount;
            PurchaseOutcome::Restocked {
                amount,
                price: AMMO_PRICE,
            }
        };
        match outcome {
            PurchaseOutcome::Restocked { amount, .. } => {
                ctx.emit(GameEvent::AmmoPurchased { amount })
            }
            _ => ctx.emit(GameEvent::PurchaseRejected),
        }
        outcome
    }
}
