//! Weapon upgrade levels and pricing
//!
//! Each stat has an integer level clamped to `[MIN_UPGRADE_LEVEL, MAX_UPGRADE_LEVEL]`.
//! Buying the next level costs `(level + 1) * base_price` from the shared currency pool.

use serde::{Deserialize, Serialize};

pub const MIN_UPGRADE_LEVEL: u8 = 0;
pub const MAX_UPGRADE_LEVEL: u8 = 5;

/// Purchasable weapon stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Damage,
    RateOfFire,
    ClipSize,
    ReloadSpeed,
    ReloadArea,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 5] = [
        UpgradeKind::Damage,
        UpgradeKind::RateOfFire,
        UpgradeKind::ClipSize,
        UpgradeKind::ReloadSpeed,
        UpgradeKind::ReloadArea,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKind::Damage => "Damage",
            UpgradeKind::RateOfFire => "Rate of Fire",
            UpgradeKind::ClipSize => "Clip Size",
            UpgradeKind::ReloadSpeed => "Reload Speed",
            UpgradeKind::ReloadArea => "Reload Area",
        }
    }

    /// Price of the first level
    pub fn base_price(&self) -> u32 {
        match self {
            UpgradeKind::Damage => 100,
            UpgradeKind::RateOfFire => 80,
            UpgradeKind::ClipSize => 60,
            UpgradeKind::ReloadSpeed => 70,
            UpgradeKind::ReloadArea => 50,
        }
    }
}

/// Result of trying to buy something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased { level: u8, price: u32 },
    /// Consumable bought (reserve ammunition)
    Restocked { amount: u32, price: u32 },
    MaxLevel,
    InsufficientFunds { price: u32 },
    /// Nothing to buy (e.g. reserve ammunition already full)
    NotNeeded,
}

impl PurchaseOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(
            self,
            PurchaseOutcome::Purchased { .. } | PurchaseOutcome::Restocked { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevels {
    pub damage: u8,
    pub rate_of_fire: u8,
    pub clip_size: u8,
    pub reload_speed: u8,
    pub reload_area: u8,
}

impl UpgradeLevels {
    pub fn level(&self, kind: UpgradeKind) -> u8 {
        match kind {
            UpgradeKind::Damage => self.damage,
            UpgradeKind::RateOfFire => self.rate_of_fire,
            UpgradeKind::ClipSize => self.clip_size,
            UpgradeKind::ReloadSpeed => self.reload_speed,
            UpgradeKind::ReloadArea => self.reload_area,
        }
    }

    /// Set a level, clamped to the valid range
    pub fn set_level(&mut self, kind: UpgradeKind, level: u8) {
        let level = level.clamp(MIN_UPGRADE_LEVEL, MAX_UPGRADE_LEVEL);
        match kind {
            UpgradeKind::Damage => self.damage = level,
            UpgradeKind::RateOfFire => self.rate_of_fire = level,
            UpgradeKind::ClipSize => self.clip_size = level,
            UpgradeKind::ReloadSpeed => self.reload_speed = level,
            UpgradeKind::ReloadArea => self.reload_area = level,
        }
    }

    /// Price of the next level, `None` once maxed
    pub fn next_price(&self, kind: UpgradeKind) -> Option<u32> {
        let level = self.level(kind);
        if level >= MAX_UPGRADE_LEVEL {
            return None;
        }
        Some((level as u32 + 1) * kind.base_price())
    }

    /// Buy the next level of `kind`, paying from `currency`
    pub fn purchase(&mut self, kind: UpgradeKind, currency: &mut u32) -> PurchaseOutcome {
        let Some(price) = self.next_price(kind) else {
            return PurchaseOutcome::MaxLevel;
        };
        if *currency < price {
            return PurchaseOutcome::InsufficientFunds { price };
        }
        *currency -= price;
        let level = self.level(kind) + 1;
        self.set_level(kind, level);
        PurchaseOutcome::Purchased { level, price }
    }
}
