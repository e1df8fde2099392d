//! Game settings and preferences
//!
//! Stored as JSON next to the binary (or wherever `--settings` points).

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Difficulty;
use crate::sim::weapon::WeaponConfig;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Pacing ===
    /// Slow-motion time scale (1.0 = real time)
    pub time_scale: f32,
    /// Wave to start on (0-based)
    pub starting_wave: u32,
    /// RNG seed for the run
    pub seed: u64,

    // === Weapon ===
    /// Start a reload automatically when the clip runs dry
    pub auto_reload: bool,
    /// Firing never consumes rounds
    pub infinite_clip: bool,
    /// Reloads never consume reserve
    pub infinite_ammo: bool,
    /// Spare rounds at the start of a run
    pub starting_reserve: u32,

    // === Presentation ===
    /// Only changes which animations the front end picks
    pub first_person: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            time_scale: 1.0,
            starting_wave: 0,
            seed: 0x5eed,

            auto_reload: true,
            infinite_clip: false,
            infinite_ammo: false,
            starting_reserve: 64,

            first_person: true,
        }
    }
}

impl Settings {
    /// Weapon tuning with this run's cheats and reload preference applied
    pub fn weapon_config(&self) -> WeaponConfig {
        WeaponConfig {
            auto_reload: self.auto_reload,
            infinite_clip: self.infinite_clip,
            infinite_ammo: self.infinite_ammo,
            ..WeaponConfig::default()
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::info!("Using default settings ({}: {})", path.display(), err);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring malformed settings in {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
