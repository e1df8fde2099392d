//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time enters only through `dt` (scaled once per tick by the context)
//! - Seeded RNG only, carried in `SimContext`
//! - Stable iteration order (roster order)
//! - No rendering, audio or platform dependencies; cues go out as `GameEvent`s

pub mod behavior;
pub mod collision;
pub mod context;
pub mod enemy;
pub mod events;
pub mod manager;
pub mod player;
pub mod projectile;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod weapon;

pub use behavior::{Behavior, ChargePhase, ThrowPhase, WarpPhase};
pub use context::SimContext;
pub use enemy::{Enemy, EnemyKind, HitOutcome, Lifecycle, MeterBand};
pub use events::{Award, Awards, GameEvent, Reward};
pub use manager::{Economy, EnemyManager, Roster};
pub use player::Player;
pub use projectile::{Projectile, ProjectileKind};
pub use spawner::{SpawnSlots, WaveSpawner};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use upgrades::{PurchaseOutcome, UpgradeKind, UpgradeLevels};
pub use weapon::{Aim, FireOutcome, ReloadOutcome, Weapon, WeaponConfig};
