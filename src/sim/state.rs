//! Game state and run flow
//!
//! Everything a run needs lives here; `tick` advances it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::context::SimContext;
use super::events::GameEvent;
use super::manager::EnemyManager;
use super::player::Player;
use super::spawner::WaveSpawner;
use super::upgrades::{PurchaseOutcome, UpgradeKind};
use super::weapon::Weapon;
use crate::Settings;
use crate::summary::WaveLog;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Wave in progress
    Playing,
    /// Between-wave rest period
    Breather,
    /// Game is paused
    Paused,
    /// Player died
    GameOver,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    pub ctx: SimContext,
    /// Current wave index (0-based)
    pub wave: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Phase to return to when unpausing
    pub(crate) resume_phase: GamePhase,
    /// Breather seconds remaining
    pub breather_timer: f32,
    /// `None` runs the roster without anyone to defend (demo/attract)
    pub player: Option<Player>,
    pub weapon: Weapon,
    pub enemies: EnemyManager,
    pub spawner: WaveSpawner,
    pub wave_log: WaveLog,
}

impl GameState {
    /// Start a run with a player on the defense line
    pub fn new(settings: &Settings) -> Self {
        let mut state = Self::unattended(settings);
        state.player = Some(Player::default());
        state
    }

    /// Start a run with nobody to defend
    pub fn unattended(settings: &Settings) -> Self {
        let mut ctx = SimContext::seeded(settings.seed, settings.difficulty);
        ctx.set_time_scale(settings.time_scale);
        ctx.first_person = settings.first_person;
        let wave = settings.starting_wave;
        let spawner = WaveSpawner::for_wave(wave, &mut ctx);
        ctx.emit(GameEvent::WaveStarted { wave });
        log::info!(
            "new run: seed {}, difficulty {}, wave {}",
            settings.seed,
            settings.difficulty.as_str(),
            wave
        );
        Self {
            ctx,
            wave,
            time_ticks: 0,
            phase: GamePhase::Playing,
            resume_phase: GamePhase::Playing,
            breather_timer: 0.0,
            player: None,
            weapon: Weapon::new(settings.weapon_config(), settings.starting_reserve),
            enemies: EnemyManager::new(),
            spawner,
            wave_log: WaveLog::new(),
        }
    }

    /// Where rounds are fired from
    pub fn eye(&self) -> Vec3 {
        self.player
            .as_ref()
            .map(|p| p.position)
            .unwrap_or_else(|| Player::default().position)
    }

    pub fn currency(&self) -> u32 {
        self.enemies.economy.currency
    }

    pub fn total_score(&self) -> u64 {
        self.enemies.economy.total_score
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Buy the next level of a weapon stat from the shared currency pool
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> PurchaseOutcome {
        self.weapon
            .purchase(kind, &mut self.enemies.economy.currency, &mut self.ctx)
    }

    /// Buy a clip's worth of reserve ammunition
    pub fn buy_ammo(&mut self) -> PurchaseOutcome {
        self.weapon.buy_ammo(&mut self.enemies.economy.currency, &mut self.ctx)
    }

    /// Queue up the next wave after a breather
    pub(crate) fn start_next_wave(&mut self) {
        self.wave += 1;
        self.spawner = WaveSpawner::for_wave(self.wave, &mut self.ctx);
        self.phase = GamePhase::Playing;
        self.ctx.emit(GameEvent::WaveStarted { wave: self.wave });
    }
}
