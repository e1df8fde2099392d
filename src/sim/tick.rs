//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::strictly_within;
use super::events::{Award, GameEvent};
use super::state::{GamePhase, GameState};
use super::weapon::{Aim, FireOutcome};
use crate::consts::*;
use crate::summary::WaveSummary;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Trigger held
    pub fire: bool,
    /// Reload button (starts a reload, or makes the active-reload attempt)
    pub reload: bool,
    /// Lob a grenade
    pub grenade: bool,
    /// Vertical aim (radians)
    pub aim_pitch: f32,
    /// Lateral aim (radians, positive toward +x)
    pub aim_yaw: f32,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - AI aims, fires and reloads
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing | GamePhase::Breather => {
                state.resume_phase = state.phase;
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = state.resume_phase,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        _ => {}
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;
    let dt = state.ctx.scaled(dt);
    let aim = Aim {
        pitch: input.aim_pitch,
        yaw: input.aim_yaw,
    };

    if let Some(player) = state.player.as_mut() {
        player.update(dt);
    }

    match state.phase {
        GamePhase::Playing => {
            let eye = state.eye();
            // Only a press during a reload that was already running is an active-reload attempt
            let was_reloading = state.weapon.is_reloading();
            if input.fire {
                state.weapon.fire(eye, aim, &mut state.ctx);
            }
            if input.reload {
                if was_reloading {
                    state.weapon.attempt_active_reload(&mut state.ctx);
                } else {
                    state.weapon.start_reload(&mut state.ctx);
                }
            }
            if input.grenade {
                if let Some(player) = state.player.as_mut() {
                    state.weapon.launch_grenade(player, aim, &mut state.ctx);
                }
            }

            state.weapon.update(dt, &mut state.ctx);
            state
                .enemies
                .update(&mut state.weapon, state.player.as_mut(), &mut state.ctx, dt);
            state.weapon.purge_projectiles();
            state.spawner.update(dt, &mut state.enemies, &mut state.ctx);

            if state.player.as_ref().is_some_and(|p| !p.alive) {
                log::info!(
                    "game over on wave {} with {} points",
                    state.wave,
                    state.total_score()
                );
                state.phase = GamePhase::GameOver;
                state.ctx.emit(GameEvent::GameOver);
                return;
            }

            if state.spawner.is_finished() && state.enemies.is_empty() {
                finish_wave(state);
            }
        }
        GamePhase::Breather => {
            // Reloading carries on between waves
            if input.reload {
                state.weapon.press_reload(&mut state.ctx);
            }
            state.weapon.update(dt, &mut state.ctx);

            state.breather_timer -= dt;
            if state.breather_timer <= 0.0 {
                state.breather_timer = 0.0;
                state.start_next_wave();
            }
        }
        GamePhase::Paused | GamePhase::GameOver => {}
    }
}

/// Log the wave, bank the perfect-wave award and start the breather
fn finish_wave(state: &mut GameState) {
    let summary = WaveSummary::from_economy(state.wave, &state.enemies.economy);
    if summary.is_perfect() {
        state.ctx.grant(Award::PerfectWave);
    }
    state.wave_log.push(summary);
    state.ctx.emit(GameEvent::WaveCleared { wave: state.wave });
    state.enemies.economy.reset_wave(state.weapon.shots_fired);
    state.breather_timer = BREATHER_DURATION;
    state.phase = GamePhase::Breather;
}

/// Aim at the nearest actor, fire when ready, reload when dry and
/// press for the active reload once the indicator is in the window
fn autopilot(state: &GameState, input: &mut TickInput) {
    let weapon = &state.weapon;
    let origin = state.eye() + weapon.config.muzzle_offset;

    let target = state
        .enemies
        .alive()
        .iter()
        .filter(|e| e.is_targetable())
        .min_by(|a, b| a.position.z.total_cmp(&b.position.z));

    if let Some(enemy) = target {
        let offset = enemy.position - origin;
        input.aim_yaw = offset.x.atan2(offset.z.max(0.1));
        input.aim_pitch = 0.0;
        input.fire = weapon.check_fire() == FireOutcome::Fired;

        // Lob a grenade into a crowd
        let crowd = state
            .enemies
            .alive()
            .iter()
            .filter(|e| e.is_targetable())
            .filter(|e| strictly_within(e.position, enemy.position, EXPLOSION_RADIUS))
            .count() as u32;
        let has_grenade = state.player.as_ref().is_some_and(|p| p.grenades > 0);
        input.grenade = has_grenade && crowd >= CHAIN_REACTION_KILLS;
    }

    if weapon.is_reloading() {
        let (low, high) = weapon.success_bounds();
        let in_window = (low..=high).contains(&weapon.reload.indicator);
        input.reload = !weapon.reload.attempt_made() && in_window;
    } else {
        input.reload = weapon.ammo_in_clip == 0;
    }
}
