//! Events raised during a tick
//!
//! The core never plays sounds or animations itself. Everything the presentation
//! layer should react to is queued here and drained once per frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use super::upgrades::UpgradeKind;

/// Something that happened this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Trigger pulled on an empty clip (or mid-reload)
    EmptyClip,
    /// Trigger pulled before the fire interval elapsed
    FireCooldown,
    /// A projectile left the muzzle
    ShotFired,
    ReloadStarted,
    ActiveReloadSuccess,
    ActiveReloadFailed,
    ReloadComplete,
    /// Actor took a non-lethal hit
    Hurt { id: u32 },
    /// Actor was killed (death animation starts)
    Killed { id: u32, kind: EnemyKind, score: u32 },
    /// Actor crossed the defense line
    Escaped { id: u32 },
    /// Rumble/siren accompanying an escape
    EscapeWarning,
    /// A thrower released a projectile
    Thrown { id: u32 },
    /// Player was struck (feedback pulse)
    PlayerHit { health: u32 },
    /// Teleporter started its tell
    WarpTell { id: u32 },
    /// Teleporter vanished and relocated
    Warped { id: u32, x: f32 },
    /// Teleporter finished fading back in
    Reappeared { id: u32 },
    /// Charger stopped strutting
    ChargeStarted { id: u32 },
    /// Explosive projectile detonated
    Explosion { at: Vec3 },
    /// Actor's lighting was burnt out by an explosion
    Burned { id: u32 },
    /// Vendor barks at the player
    Talk { id: u32 },
    UpgradePurchased { kind: UpgradeKind, level: u8 },
    AmmoPurchased { amount: u32 },
    PurchaseRejected,
    /// Bonus crosser paid out
    BonusReward(Reward),
    /// Fire-once achievement trigger
    AwardUnlocked(Award),
    WaveStarted { wave: u32 },
    WaveCleared { wave: u32 },
    GameOver,
}

/// Achievement triggers consumed by an external tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Award {
    /// Killed a charger before it charged
    StoppedCharger,
    /// Killed a teleporter before it completed a warp
    StoppedTeleporter,
    /// Point-blank kill
    CloseCall,
    /// One explosion took out several actors
    ChainReaction,
    /// Cleared a wave without an escape
    PerfectWave,
}

/// Fire-once award flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Awards {
    pub stopped_charger: bool,
    pub stopped_teleporter: bool,
    pub close_call: bool,
    pub chain_reaction: bool,
    pub perfect_wave: bool,
}

impl Awards {
    fn flag_mut(&mut self, award: Award) -> &mut bool {
        match award {
            Award::StoppedCharger => &mut self.stopped_charger,
            Award::StoppedTeleporter => &mut self.stopped_teleporter,
            Award::CloseCall => &mut self.close_call,
            Award::ChainReaction => &mut self.chain_reaction,
            Award::PerfectWave => &mut self.perfect_wave,
        }
    }

    /// Set the flag; returns true only the first time
    pub fn grant(&mut self, award: Award) -> bool {
        let flag = self.flag_mut(award);
        if *flag {
            return false;
        }
        *flag = true;
        true
    }

    pub fn has(&self, award: Award) -> bool {
        match award {
            Award::StoppedCharger => self.stopped_charger,
            Award::StoppedTeleporter => self.stopped_teleporter,
            Award::CloseCall => self.close_call,
            Award::ChainReaction => self.chain_reaction,
            Award::PerfectWave => self.perfect_wave,
        }
    }
}

/// Random payout for killing a bonus crosser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reward {
    Health,
    Grenade,
    Currency(u32),
}
