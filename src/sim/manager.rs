//! Roster coordination and the wave economy
//!
//! Every actor sits in exactly one of three rosters: alive, dying, or
//! escaping. Membership only changes inside this module. Collision handling
//! flags state on the actors first; the rosters are rebuilt afterwards so
//! nothing is moved while it is being iterated.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{projectile_actor_hit, strictly_within};
use super::context::SimContext;
use super::enemy::{Enemy, EnemyKind, HitOutcome};
use super::events::{Award, GameEvent, Reward};
use super::player::Player;
use super::projectile::Projectile;
use super::spawner::SpawnSlots;
use super::weapon::Weapon;
use crate::consts::*;
use crate::lane_x;

/// Depth at which bonus crossers traverse the field
pub const BONUS_CROSSING_DEPTH: f32 = 25.0;

/// Which roster an actor is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roster {
    Alive,
    Dying,
    Escaping,
}

/// Per-wave counters plus the persistent currency pool and run score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Economy {
    /// Spendable money; survives wave resets
    pub currency: u32,
    /// Score across the whole run
    pub total_score: u64,
    pub kills: u32,
    pub escapes: u32,
    pub speed_kills: u32,
    pub perfect_kills: u32,
    pub close_calls: u32,
    /// Score this wave
    pub score: u32,
    /// Summed engagement time of this wave's kills
    pub kill_time: f32,
    pub hits: u32,
    pub shots_fired: u32,
    pub currency_earned: u32,
    /// Weapon shot counter when the wave started
    shots_baseline: u32,
}

impl Economy {
    /// Hit percentage, 100 when nothing was fired
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            return 100.0;
        }
        (self.hits as f32 / self.shots_fired as f32 * 100.0).min(100.0)
    }

    pub fn average_kill_time(&self) -> f32 {
        if self.kills == 0 {
            return 0.0;
        }
        self.kill_time / self.kills as f32
    }

    /// Pick up the weapon's running shot total
    pub fn sync_shots(&mut self, weapon_total: u32) {
        self.shots_fired = weapon_total.saturating_sub(self.shots_baseline);
    }

    /// Zero the per-wave counters; currency and run score carry over
    pub fn reset_wave(&mut self, weapon_total: u32) {
        *self = Self {
            currency: self.currency,
            total_score: self.total_score,
            shots_baseline: weapon_total,
            ..Self::default()
        };
    }

    fn record_kill(&mut self, enemy: &Enemy) {
        if !enemy.kind.is_threat() {
            return;
        }
        self.kills += 1;
        self.kill_time += enemy.engagement_time;
        if enemy.engaged && enemy.engagement_time <= SPEED_KILL_WINDOW {
            self.speed_kills += 1;
        }
        if enemy.hits_taken == 1 {
            self.perfect_kills += 1;
        }
        if enemy.close_call {
            self.close_calls += 1;
        }
        self.score += enemy.score_awarded;
        self.total_score += enemy.score_awarded as u64;
        self.currency += enemy.money;
        self.currency_earned += enemy.money;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyManager {
    alive: Vec<Enemy>,
    dying: Vec<Enemy>,
    escaping: Vec<Enemy>,
    pub slots: SpawnSlots,
    pub economy: Economy,
    next_id: u32,
}

impl EnemyManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alive(&self) -> &[Enemy] {
        &self.alive
    }

    pub fn dying(&self) -> &[Enemy] {
        &self.dying
    }

    pub fn escaping(&self) -> &[Enemy] {
        &self.escaping
    }

    /// No actors in any roster
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty() && self.dying.is_empty() && self.escaping.is_empty()
    }

    pub fn roster_of(&self, id: u32) -> Option<Roster> {
        if self.alive.iter().any(|e| e.id == id) {
            Some(Roster::Alive)
        } else if self.dying.iter().any(|e| e.id == id) {
            Some(Roster::Dying)
        } else if self.escaping.iter().any(|e| e.id == id) {
            Some(Roster::Escaping)
        } else {
            None
        }
    }

    pub fn get(&self, id: u32) -> Option<&Enemy> {
        self.alive
            .iter()
            .chain(&self.dying)
            .chain(&self.escaping)
            .find(|e| e.id == id)
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn `kind` at the far end of a free lane
    ///
    /// Threats need a lane; returns `None` when all lanes are taken.
    /// Crossers don't use lanes.
    pub fn spawn(&mut self, kind: EnemyKind, ctx: &mut SimContext) -> Option<u32> {
        if !kind.is_threat() {
            return Some(self.spawn_at(kind, Vec3::new(0.0, 0.0, BONUS_CROSSING_DEPTH), ctx));
        }
        if !self.slots.has_free() {
            return None;
        }
        let id = self.next_entity_id();
        let lane = self.slots.reserve(id, &mut ctx.rng)?;
        let mut enemy = Enemy::spawn(id, kind, Vec3::new(lane_x(lane), 0.0, SPAWN_DEPTH), ctx);
        enemy.lane = Some(lane);
        log::debug!("spawned {} {} in lane {}", kind.as_str(), id, lane);
        self.alive.push(enemy);
        Some(id)
    }

    /// Spawn `kind` at an explicit position without a lane
    pub fn spawn_at(&mut self, kind: EnemyKind, position: Vec3, ctx: &mut SimContext) -> u32 {
        let id = self.next_entity_id();
        let enemy = Enemy::spawn(id, kind, position, ctx);
        log::debug!("spawned {} {} at {:?}", kind.as_str(), id, enemy.position);
        self.alive.push(enemy);
        id
    }

    /// Strike a live actor directly, bypassing projectile resolution
    ///
    /// A lethal strike moves the actor to the dying roster before returning.
    /// Unknown or already-dead ids are `Ignored`.
    pub fn hit(
        &mut self,
        id: u32,
        damage: f32,
        mut player: Option<&mut Player>,
        ctx: &mut SimContext,
    ) -> HitOutcome {
        let player_pos = player.as_deref().map(|p| p.position);
        let Some(enemy) = self.alive.iter_mut().find(|e| e.id == id) else {
            return HitOutcome::Ignored;
        };
        let outcome = enemy.on_hit(damage, player_pos, ctx);
        if outcome == HitOutcome::Killed {
            self.retire_dead(player.as_deref_mut(), ctx);
        }
        outcome
    }

    /// Kill a live actor outright and move it to the dying roster
    ///
    /// Returns false for unknown or already-dead ids.
    pub fn kill(
        &mut self,
        id: u32,
        mut player: Option<&mut Player>,
        ctx: &mut SimContext,
    ) -> bool {
        let player_pos = player.as_deref().map(|p| p.position);
        let Some(enemy) = self.alive.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        if !enemy.force_kill(player_pos, ctx) {
            return false;
        }
        self.retire_dead(player.as_deref_mut(), ctx);
        true
    }

    /// Thrown objects from every live actor
    pub fn hostile_projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.alive.iter().flat_map(|e| e.behavior.projectiles())
    }

    /// One coordinator tick; `dt` is already slow-motion scaled
    ///
    /// 1. Resolve the weapon's rounds against live actors
    /// 2. Advance every actor in every roster; warping teleporters change lanes
    /// 3. Purge dying/escaping actors that are done
    /// 4. Move newly dead actors to the dying roster and bank their rewards
    /// 5. Let at most one actor through the defense line
    pub fn update(
        &mut self,
        weapon: &mut Weapon,
        mut player: Option<&mut Player>,
        ctx: &mut SimContext,
        dt: f32,
    ) {
        let player_pos = player.as_deref().map(|p| p.position);
        for projectile in weapon.projectiles.iter_mut() {
            self.resolve_projectile(projectile, player_pos, ctx);
        }

        for enemy in self.alive.iter_mut() {
            enemy.update(player.as_deref_mut(), ctx, dt);
        }
        for enemy in self.dying.iter_mut().chain(self.escaping.iter_mut()) {
            enemy.update(None, ctx, dt);
        }
        self.relocate_warpers(ctx);

        self.dying.retain(|e| !e.is_purgeable());
        self.escaping.retain(|e| !e.is_purgeable());

        self.retire_dead(player.as_deref_mut(), ctx);
        self.retire_crossers(ctx);
        match player {
            Some(player) => self.process_escape(player, ctx),
            None => self.retire_unattended(),
        }
        self.economy.sync_shots(weapon.shots_fired);
    }

    /// Test one round against the live roster, nearest actor first
    fn resolve_projectile(
        &mut self,
        projectile: &mut Projectile,
        player_pos: Option<Vec3>,
        ctx: &mut SimContext,
    ) {
        if projectile.remove {
            return;
        }
        let mut candidates: Vec<usize> = self
            .alive
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                e.is_targetable()
                    && !projectile.has_struck(e.id)
                    && projectile_actor_hit(projectile.pos, e.position, e.half_width())
            })
            .map(|(i, _)| i)
            .collect();
        candidates.sort_by(|&a, &b| self.alive[a].position.z.total_cmp(&self.alive[b].position.z));

        for index in candidates {
            // An earlier strike from this round may have killed it (explosion)
            if !self.alive[index].is_targetable() {
                continue;
            }
            projectile.record_strike(self.alive[index].id);
            self.economy.hits += 1;

            if projectile.is_explosive() {
                let mut killed = self.explode(index, player_pos, ctx);
                let outcome = self.alive[index].on_hit(projectile.damage, player_pos, ctx);
                if outcome == HitOutcome::Killed {
                    killed += 1;
                }
                if killed >= CHAIN_REACTION_KILLS {
                    ctx.grant(Award::ChainReaction);
                }
                projectile.remove = true;
                break;
            }

            self.alive[index].on_hit(projectile.damage, player_pos, ctx);
            if !projectile.is_piercing() {
                projectile.remove = true;
                break;
            }
        }
    }

    /// Blast centered on the actor at `index`; returns splash kills
    fn explode(&mut self, index: usize, player_pos: Option<Vec3>, ctx: &mut SimContext) -> u32 {
        let center = self.alive[index].position;
        let struck_id = self.alive[index].id;
        self.alive[index].lighting = 0.0;
        ctx.emit(GameEvent::Burned { id: struck_id });
        ctx.emit(GameEvent::Explosion { at: center });

        let mut killed = 0;
        for enemy in self.alive.iter_mut() {
            if enemy.id == struck_id || !enemy.is_targetable() {
                continue;
            }
            let caught = strictly_within(enemy.position, center, EXPLOSION_RADIUS);
            if caught && enemy.force_kill(player_pos, ctx) {
                killed += 1;
            }
        }
        log::debug!("explosion at {:?} caught {} actors", center, killed);
        killed
    }

    /// Teleporters that vanished this tick give up their lane and take a free one
    ///
    /// Its old lane may be drawn again; an actor placed without a lane stays put when
    /// every lane is taken.
    fn relocate_warpers(&mut self, ctx: &mut SimContext) {
        for enemy in self.alive.iter_mut() {
            if !enemy.behavior.take_relocation() {
                continue;
            }
            self.slots.release(enemy.id);
            if let Some(lane) = self.slots.reserve(enemy.id, &mut ctx.rng) {
                enemy.lane = Some(lane);
                enemy.position.x = lane_x(lane);
            }
            log::trace!("teleporter {} warped to x {:.1}", enemy.id, enemy.position.x);
            ctx.emit(GameEvent::Warped {
                id: enemy.id,
                x: enemy.position.x,
            });
        }
    }

    /// Move actors that are no longer alive out of the live roster
    fn retire_dead(&mut self, mut player: Option<&mut Player>, ctx: &mut SimContext) {
        let (gone, alive): (Vec<Enemy>, Vec<Enemy>) =
            std::mem::take(&mut self.alive).into_iter().partition(|e| !e.is_alive());
        self.alive = alive;

        for enemy in gone {
            self.slots.release(enemy.id);
            if enemy.is_dying() {
                self.economy.record_kill(&enemy);
                if enemy.kind == EnemyKind::Bonus {
                    self.pay_bonus(player.as_deref_mut(), ctx);
                }
                self.dying.push(enemy);
            } else {
                self.escaping.push(enemy);
            }
        }
    }

    /// Random payout for a bonus kill; goes to currency when there is no player to receive it
    fn pay_bonus(&mut self, player: Option<&mut Player>, ctx: &mut SimContext) {
        let drawn = match ctx.rng.random_range(0..3) {
            0 => Reward::Health,
            1 => Reward::Grenade,
            _ => Reward::Currency(BONUS_CURRENCY),
        };
        let reward = match (drawn, player) {
            (Reward::Health, Some(player)) if player.alive => {
                player.heal(1);
                drawn
            }
            (Reward::Grenade, Some(player)) if player.alive => {
                player.grenades += 1;
                drawn
            }
            (Reward::Currency(amount), _) => {
                self.economy.currency += amount;
                self.economy.currency_earned += amount;
                drawn
            }
            _ => {
                self.economy.currency += BONUS_CURRENCY;
                self.economy.currency_earned += BONUS_CURRENCY;
                Reward::Currency(BONUS_CURRENCY)
            }
        };
        log::debug!("bonus reward: {:?}", reward);
        ctx.emit(GameEvent::BonusReward(reward));
    }

    /// Crossers that left the field sideways; no penalty
    fn retire_crossers(&mut self, ctx: &mut SimContext) {
        let (out, alive): (Vec<Enemy>, Vec<Enemy>) =
            std::mem::take(&mut self.alive).into_iter().partition(|e| e.crossed_out());
        self.alive = alive;
        for mut enemy in out {
            enemy.on_escaped(ctx);
            self.escaping.push(enemy);
        }
    }

    /// At most one actor reaches the player per tick
    fn process_escape(&mut self, player: &mut Player, ctx: &mut SimContext) {
        let depth = player.position.z;
        let Some(index) = self.alive.iter().position(|e| e.reached_player(depth)) else {
            return;
        };
        let mut enemy = self.alive.remove(index);
        enemy.on_collide(player);
        enemy.on_escaped(ctx);
        self.slots.release(enemy.id);
        self.economy.escapes += 1;
        ctx.emit(GameEvent::PlayerHit { health: player.health });
        self.escaping.push(enemy);
    }

    /// Without a player, actors that walk off the far end are dropped quietly
    fn retire_unattended(&mut self) {
        let (out, alive): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut self.alive)
            .into_iter()
            .partition(|e| e.kind.is_threat() && e.position.z < ESCAPE_DEPTH);
        self.alive = alive;
        for mut enemy in out {
            enemy.depart();
            self.slots.release(enemy.id);
            log::trace!("{} {} left the field unattended", enemy.kind.as_str(), enemy.id);
            self.escaping.push(enemy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Difficulty;
    use crate::sim::projectile::ProjectileKind;
    use crate::sim::weapon::Aim;

    fn ctx() -> SimContext {
        SimContext::seeded(17, Difficulty::Normal)
    }

    /// Round placed just past the actor's depth so it registers this tick
    fn round_at(x: f32, z: f32, kind: ProjectileKind, damage: f32) -> Projectile {
        let origin = Vec3::new(x, 1.4, 0.5);
        let mut projectile = Projectile::aimed(origin, Vec3::new(x, 1.4, 80.0), 80.0, kind, damage);
        projectile.pos = Vec3::new(x, 1.4, z);
        projectile
    }

    fn assert_single_roster(manager: &EnemyManager) {
        for enemy in manager.alive() {
            assert!(enemy.is_alive());
        }
        for enemy in manager.dying() {
            assert!(enemy.is_dying());
        }
        for enemy in manager.escaping() {
            assert!(enemy.is_escaping());
        }
        let mut ids: Vec<u32> = manager
            .alive()
            .iter()
            .chain(manager.dying())
            .chain(manager.escaping())
            .map(|e| e.id)
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total, "actor listed in two rosters");
    }

    #[test]
    fn test_spawn_reserves_lane_and_kill_releases_it() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let id = manager.spawn(EnemyKind::Normal, &mut ctx).unwrap();
        assert_eq!(manager.slots.free_count(), LANE_COUNT - 1);
        assert!(manager.kill(id, None, &mut ctx));
        assert_eq!(manager.roster_of(id), Some(Roster::Dying));
        assert_eq!(manager.slots.free_count(), LANE_COUNT);
        assert!(!manager.kill(id, None, &mut ctx));
        assert!(!manager.kill(999, None, &mut ctx));
        assert_eq!(manager.economy.kills, 1);
        assert_currency(&manager, EnemyKind::Normal.stats().money);
    }

    fn assert_currency(manager: &EnemyManager, expected: u32) {
        assert_eq!(manager.economy.currency, expected);
        assert_eq!(manager.economy.currency_earned, expected);
    }

    #[test]
    fn test_standard_hit_then_kill_moves_to_dying() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let mut player = Player::default();
        let id = manager.spawn_at(EnemyKind::Normal, Vec3::new(0.0, 0.0, 20.0), &mut ctx);

        weapon.projectiles.push(round_at(0.0, 20.5, ProjectileKind::Standard, 1.0));
        manager.update(&mut weapon, Some(&mut player), &mut ctx, 0.0);
        weapon.purge_projectiles();
        assert_eq!(manager.roster_of(id), Some(Roster::Alive));
        assert!(weapon.projectiles.is_empty());
        assert!(ctx.events.contains(&GameEvent::Hurt { id }));

        weapon.projectiles.push(round_at(0.0, 20.5, ProjectileKind::Standard, 1.0));
        manager.update(&mut weapon, Some(&mut player), &mut ctx, 0.0);
        assert_eq!(manager.roster_of(id), Some(Roster::Dying));
        assert_eq!(manager.economy.kills, 1);
        assert_eq!(manager.economy.hits, 2);
        assert_eq!(manager.economy.perfect_kills, 0);
        assert_single_roster(&manager);
    }

    #[test]
    fn test_one_shot_kill_is_perfect_and_speedy() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let id = manager.spawn_at(EnemyKind::Normal, Vec3::new(0.0, 0.0, 30.0), &mut ctx);
        weapon.projectiles.push(round_at(0.0, 30.5, ProjectileKind::Standard, 5.0));
        manager.update(&mut weapon, None, &mut ctx, 0.0);
        assert_eq!(manager.roster_of(id), Some(Roster::Dying));
        assert_eq!(manager.economy.perfect_kills, 1);
        assert_eq!(manager.economy.speed_kills, 1);
        assert!(manager.economy.score > 0);
    }

    #[test]
    fn test_standard_round_hits_nearest_only() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let far = manager.spawn_at(EnemyKind::Normal, Vec3::new(0.0, 0.0, 30.0), &mut ctx);
        let near = manager.spawn_at(EnemyKind::Normal, Vec3::new(0.0, 0.0, 20.0), &mut ctx);
        weapon.projectiles.push(round_at(0.0, 31.0, ProjectileKind::Standard, 1.0));
        manager.update(&mut weapon, None, &mut ctx, 0.0);
        assert_eq!(manager.get(near).map(|e| e.hits_taken), Some(1));
        assert_eq!(manager.get(far).map(|e| e.hits_taken), Some(0));
    }

    #[test]
    fn test_piercing_round_hits_each_actor_once() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let a = manager.spawn_at(EnemyKind::Inflater, Vec3::new(0.0, 0.0, 20.0), &mut ctx);
        let b = manager.spawn_at(EnemyKind::Inflater, Vec3::new(0.0, 0.0, 22.0), &mut ctx);
        weapon.projectiles.push(round_at(0.0, 23.0, ProjectileKind::Piercing, 1.0));
        manager.update(&mut weapon, None, &mut ctx, 0.0);
        assert!(!weapon.projectiles[0].remove);
        // Same round still overlapping next tick: no double strike
        manager.update(&mut weapon, None, &mut ctx, 0.0);
        assert_eq!(manager.get(a).map(|e| e.hits_taken), Some(1));
        assert_eq!(manager.get(b).map(|e| e.hits_taken), Some(1));
    }

    #[test]
    fn test_explosion_kills_cluster_and_grants_chain_reaction() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let target = manager.spawn_at(EnemyKind::Inflater, Vec3::new(0.0, 0.0, 20.0), &mut ctx);
        let near_a = manager.spawn_at(EnemyKind::Normal, Vec3::new(2.0, 0.0, 21.0), &mut ctx);
        let near_b = manager.spawn_at(EnemyKind::Normal, Vec3::new(-2.0, 0.0, 21.0), &mut ctx);
        // Exactly on the radius: outside a strict blast
        let edge_pos = Vec3::new(EXPLOSION_RADIUS, 0.0, 20.0);
        let edge = manager.spawn_at(EnemyKind::Normal, edge_pos, &mut ctx);

        weapon.projectiles.push(round_at(0.0, 20.5, ProjectileKind::Explosive, 1.0));
        manager.update(&mut weapon, None, &mut ctx, 0.0);

        assert_eq!(manager.roster_of(near_a), Some(Roster::Dying));
        assert_eq!(manager.roster_of(near_b), Some(Roster::Dying));
        assert_eq!(manager.roster_of(edge), Some(Roster::Alive));
        // Struck actor takes a standard hit and has its lighting burnt out
        let struck = manager.get(target).unwrap();
        assert_eq!(struck.lighting, 0.0);
        assert_eq!(struck.hits_taken, 1);
        assert_eq!(manager.roster_of(target), Some(Roster::Alive));
        assert!(!ctx.awards.has(Award::ChainReaction));
        assert!(ctx.events.iter().any(|e| matches!(e, GameEvent::Explosion { .. })));
        assert_single_roster(&manager);

        let mut ctx = SimContext::seeded(3, Difficulty::Normal);
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        manager.spawn_at(EnemyKind::Normal, Vec3::new(0.0, 0.0, 20.0), &mut ctx);
        manager.spawn_at(EnemyKind::Normal, Vec3::new(1.0, 0.0, 21.0), &mut ctx);
        manager.spawn_at(EnemyKind::Normal, Vec3::new(-1.0, 0.0, 21.0), &mut ctx);
        weapon.projectiles.push(round_at(0.0, 20.5, ProjectileKind::Explosive, 2.0));
        manager.update(&mut weapon, None, &mut ctx, 0.0);
        assert_eq!(manager.dying().len(), 3);
        assert!(ctx.awards.has(Award::ChainReaction));
    }

    #[test]
    fn test_one_escape_per_tick() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let mut player = Player::default();
        for x in [-4.0, 0.0, 4.0] {
            manager.spawn_at(EnemyKind::Normal, Vec3::new(x, 0.0, 0.0), &mut ctx);
        }
        manager.update(&mut weapon, Some(&mut player), &mut ctx, 0.0);
        assert_eq!(manager.escaping().len(), 1);
        assert_eq!(manager.alive().len(), 2);
        assert_eq!(player.health, PLAYER_MAX_HEALTH - 1);
        manager.update(&mut weapon, Some(&mut player), &mut ctx, 0.0);
        manager.update(&mut weapon, Some(&mut player), &mut ctx, 0.0);
        assert_eq!(manager.escaping().len(), 3);
        assert_eq!(manager.economy.escapes, 3);
        assert_eq!(player.health, PLAYER_MAX_HEALTH - 3);
        assert_single_roster(&manager);
    }

    #[test]
    fn test_escape_releases_spawn_lane() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let mut player = Player::default();
        let id = manager.spawn(EnemyKind::Normal, &mut ctx).unwrap();
        assert!(manager.slots.lane_of(id).is_some());
        assert_eq!(manager.slots.free_count(), LANE_COUNT - 1);

        for _ in 0..400 {
            manager.update(&mut weapon, Some(&mut player), &mut ctx, 0.1);
            if manager.economy.escapes > 0 {
                break;
            }
        }
        assert_eq!(manager.economy.escapes, 1);
        assert_eq!(manager.roster_of(id), Some(Roster::Escaping));
        assert_eq!(manager.slots.lane_of(id), None);
        assert_eq!(manager.slots.free_count(), LANE_COUNT);
    }

    #[test]
    fn test_direct_hit_retires_kill_at_once() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let id = manager.spawn(EnemyKind::Normal, &mut ctx).unwrap();
        assert_eq!(manager.hit(id, 1.0, None, &mut ctx), HitOutcome::Hurt);
        assert_eq!(manager.roster_of(id), Some(Roster::Alive));
        assert_eq!(manager.hit(id, 1.0, None, &mut ctx), HitOutcome::Killed);
        // No tick in between: already out of the live roster
        assert_eq!(manager.roster_of(id), Some(Roster::Dying));
        assert!(manager.alive().is_empty());
        assert_eq!(manager.slots.free_count(), LANE_COUNT);
        assert_eq!(manager.economy.kills, 1);
        assert_eq!(manager.hit(id, 1.0, None, &mut ctx), HitOutcome::Ignored);
        assert_eq!(manager.hit(404, 1.0, None, &mut ctx), HitOutcome::Ignored);
        assert_single_roster(&manager);
    }

    #[test]
    fn test_teleporter_warps_into_free_lane() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let id = manager.spawn(EnemyKind::Teleporter, &mut ctx).unwrap();
        for _ in 0..LANE_COUNT - 2 {
            manager.spawn(EnemyKind::Normal, &mut ctx);
        }
        assert_eq!(manager.slots.free_count(), 1);

        let mut warped = false;
        for _ in 0..(8.0 / SIM_DT) as usize {
            manager.update(&mut weapon, None, &mut ctx, SIM_DT);
            if ctx.events.iter().any(|e| matches!(e, GameEvent::Warped { .. })) {
                warped = true;
                break;
            }
        }
        assert!(warped, "teleporter never warped");

        let lane = manager.slots.lane_of(id);
        assert!(lane.is_some());
        let enemy = manager.get(id).unwrap();
        assert_eq!(enemy.lane, lane);
        assert_eq!(enemy.position.x, lane.map(lane_x).unwrap_or_default());
        // Still one lane per actor
        assert_eq!(manager.slots.free_count(), 1);
        let mut held: Vec<usize> = manager
            .alive()
            .iter()
            .filter_map(|e| manager.slots.lane_of(e.id))
            .collect();
        held.sort_unstable();
        held.dedup();
        assert_eq!(held.len(), LANE_COUNT - 1);
    }

    #[test]
    fn test_no_player_skips_collision() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let id = manager.spawn_at(EnemyKind::Normal, Vec3::new(0.0, 0.0, 0.0), &mut ctx);
        manager.update(&mut weapon, None, &mut ctx, 0.0);
        assert_eq!(manager.roster_of(id), Some(Roster::Alive));
        assert_eq!(manager.economy.escapes, 0);
        // Walks off the far end and is dropped without penalty
        for _ in 0..100 {
            manager.update(&mut weapon, None, &mut ctx, 0.1);
        }
        assert!(manager.is_empty());
        assert_eq!(manager.economy.escapes, 0);
    }

    #[test]
    fn test_dying_actor_purged_after_duration() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let id = manager.spawn_at(EnemyKind::Normal, Vec3::new(0.0, 0.0, 30.0), &mut ctx);
        manager.kill(id, None, &mut ctx);
        manager.update(&mut weapon, None, &mut ctx, DYING_DURATION);
        assert_eq!(manager.roster_of(id), Some(Roster::Dying));
        manager.update(&mut weapon, None, &mut ctx, 0.1);
        assert_eq!(manager.roster_of(id), None);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_bonus_crosser_pays_reward() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut player = Player::default();
        player.health = 1;
        let id = manager.spawn(EnemyKind::Bonus, &mut ctx).unwrap();
        assert_eq!(manager.slots.free_count(), LANE_COUNT);
        let grenades = player.grenades;
        assert!(manager.kill(id, Some(&mut player), &mut ctx));
        let reward = ctx.events.iter().find_map(|e| match e {
            GameEvent::BonusReward(r) => Some(*r),
            _ => None,
        });
        match reward {
            Some(Reward::Health) => assert_eq!(player.health, 2),
            Some(Reward::Grenade) => assert_eq!(player.grenades, grenades + 1),
            Some(Reward::Currency(amount)) => assert_eq!(manager.economy.currency, amount),
            None => panic!("no reward paid"),
        }
        // Crossers never count toward kills
        assert_eq!(manager.economy.kills, 0);
    }

    #[test]
    fn test_bonus_without_player_pays_currency() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        for _ in 0..6 {
            let id = manager.spawn(EnemyKind::Bonus, &mut ctx).unwrap();
            manager.kill(id, None, &mut ctx);
        }
        assert_eq!(manager.economy.currency, 6 * BONUS_CURRENCY);
    }

    #[test]
    fn test_crosser_leaving_field_is_not_an_escape() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let mut player = Player::default();
        let id = manager.spawn(EnemyKind::Bonus, &mut ctx).unwrap();
        for _ in 0..200 {
            manager.update(&mut weapon, Some(&mut player), &mut ctx, 0.1);
            if manager.roster_of(id) != Some(Roster::Alive) {
                break;
            }
        }
        assert_ne!(manager.roster_of(id), Some(Roster::Alive));
        assert_eq!(manager.economy.escapes, 0);
        assert_eq!(player.health, PLAYER_MAX_HEALTH);
        assert!(!ctx.events.contains(&GameEvent::EscapeWarning));
    }

    #[test]
    fn test_weapon_shots_feed_accuracy() {
        let mut ctx = ctx();
        let mut manager = EnemyManager::new();
        let mut weapon = Weapon::default();
        let eye = Player::default().position;
        let lane = Vec3::new(eye.x + weapon.config.muzzle_offset.x, 0.0, 5.0);
        manager.spawn_at(EnemyKind::Inflater, lane, &mut ctx);
        weapon.fire(eye, Aim::default(), &mut ctx);
        // Still cooling down
        weapon.fire(eye, Aim { pitch: 0.0, yaw: 0.6 }, &mut ctx);
        assert_eq!(manager.economy.accuracy(), 100.0);
        for _ in 0..10 {
            weapon.update(1.0 / 60.0, &mut ctx);
            manager.update(&mut weapon, None, &mut ctx, 1.0 / 60.0);
            weapon.purge_projectiles();
        }
        assert_eq!(manager.economy.shots_fired, 1);
        assert_eq!(manager.economy.hits, 1);
        assert_eq!(manager.economy.accuracy(), 100.0);
    }

    #[test]
    fn test_reset_wave_keeps_currency() {
        let mut economy = Economy {
            currency: 120,
            total_score: 900,
            kills: 4,
            score: 400,
            ..Economy::default()
        };
        economy.reset_wave(10);
        assert_eq!(economy.currency, 120);
        assert_eq!(economy.total_score, 900);
        assert_eq!(economy.kills, 0);
        economy.sync_shots(14);
        assert_eq!(economy.shots_fired, 4);
    }
}
