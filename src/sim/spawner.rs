//! Wave composition and spawn-lane reservation

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::context::SimContext;
use super::enemy::EnemyKind;
use super::manager::EnemyManager;
use crate::consts::LANE_COUNT;

/// One actor per lane; an actor holds its lane until it dies, escapes or warps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnSlots {
    lanes: [Option<u32>; LANE_COUNT],
}

impl SpawnSlots {
    pub fn free_count(&self) -> usize {
        self.lanes.iter().filter(|l| l.is_none()).count()
    }

    pub fn has_free(&self) -> bool {
        self.lanes.iter().any(|l| l.is_none())
    }

    /// Lane held by `id`, if any
    pub fn lane_of(&self, id: u32) -> Option<usize> {
        self.lanes.iter().position(|l| *l == Some(id))
    }

    /// Reserve a random free lane for `id`
    pub fn reserve(&mut self, id: u32, rng: &mut Pcg32) -> Option<usize> {
        let free: Vec<usize> = (0..LANE_COUNT).filter(|&i| self.lanes[i].is_none()).collect();
        if free.is_empty() {
            return None;
        }
        let lane = free[rng.random_range(0..free.len())];
        self.lanes[lane] = Some(id);
        Some(lane)
    }

    /// Free whatever lane `id` holds; unknown ids are ignored
    pub fn release(&mut self, id: u32) -> bool {
        match self.lane_of(id) {
            Some(lane) => {
                self.lanes[lane] = None;
                true
            }
            None => false,
        }
    }
}

/// Wave index from which each special variant appears
fn unlocked_kinds(wave: u32) -> Vec<EnemyKind> {
    let schedule = [
        (1, EnemyKind::Charger),
        (2, EnemyKind::Thrower),
        (3, EnemyKind::Teleporter),
        (4, EnemyKind::Inflater),
        (5, EnemyKind::Vendor),
    ];
    schedule
        .iter()
        .filter(|(from, _)| wave >= *from)
        .map(|(_, kind)| *kind)
        .collect()
}

/// Feeds a wave's actors into the roster over time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSpawner {
    pub wave: u32,
    queue: VecDeque<EnemyKind>,
    /// Seconds until the next spawn attempt
    timer: f32,
    /// Seconds between spawns
    pub interval: f32,
}

impl WaveSpawner {
    /// Build the spawn queue for `wave` (0-based)
    pub fn for_wave(wave: u32, ctx: &mut SimContext) -> Self {
        let count = 6 + 2 * wave as usize;
        let specials = unlocked_kinds(wave);
        let mut queue = VecDeque::with_capacity(count + 1);
        for _ in 0..count {
            let kind = if specials.is_empty() || ctx.rng.random_bool(0.5) {
                EnemyKind::Normal
            } else {
                specials[ctx.rng.random_range(0..specials.len())]
            };
            queue.push_back(kind);
        }
        if wave >= 1 {
            queue.insert(count / 2, EnemyKind::Bonus);
        }
        let interval = (2.0 - 0.1 * wave as f32).max(0.6);
        log::info!("wave {}: {} actors, spawn every {:.1}s", wave, queue.len(), interval);
        Self {
            wave,
            queue,
            timer: 0.0,
            interval,
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    /// Spawn the next actor when the timer is up and a lane is free
    ///
    /// `dt` is already slow-motion scaled.
    pub fn update(&mut self, dt: f32, enemies: &mut EnemyManager, ctx: &mut SimContext) {
        self.timer = (self.timer - dt).max(0.0);
        if self.timer > 0.0 {
            return;
        }
        let Some(&kind) = self.queue.front() else {
            return;
        };
        if enemies.spawn(kind, ctx).is_some() {
            self.queue.pop_front();
            self.timer = self.interval;
        }
    }
}
