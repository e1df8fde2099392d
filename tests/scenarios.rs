use glam::Vec3;
use wave_siege::Difficulty;
use wave_siege::consts::*;
use wave_siege::sim::weapon::ACTIVE_RELOAD_CENTER;
use wave_siege::sim::{
    Award, Behavior, ChargePhase, EnemyKind, EnemyManager, FireOutcome, GameEvent, HitOutcome,
    Player, Projectile, ProjectileKind, ReloadOutcome, Roster, SimContext, WarpPhase, Weapon,
    WeaponConfig,
};
use wave_siege::summary::WaveSummary;

fn ctx() -> SimContext {
    SimContext::seeded(2024, Difficulty::Normal)
}

fn five_round_weapon(reserve: u32) -> Weapon {
    let config = WeaponConfig {
        base_clip_size: 5,
        ..WeaponConfig::default()
    };
    Weapon::new(config, reserve)
}

#[test]
fn empty_clip_refuses_then_reload_refills() {
    let mut ctx = ctx();
    let mut weapon = five_round_weapon(20);
    weapon.ammo_in_clip = 0;

    let outcome = weapon.fire(Player::default().position, Default::default(), &mut ctx);
    assert_eq!(outcome, FireOutcome::Empty);
    assert!(ctx.events.contains(&GameEvent::EmptyClip));
    assert!(weapon.projectiles.is_empty());

    assert_eq!(weapon.start_reload(&mut ctx), ReloadOutcome::Started);
    while weapon.is_reloading() {
        weapon.update(SIM_DT, &mut ctx);
    }
    assert_eq!(weapon.ammo_in_clip, 5);
    assert_eq!(weapon.reserve, 15);
}

#[test]
fn start_reload_while_reloading_keeps_progress() {
    let mut ctx = ctx();
    let mut weapon = five_round_weapon(20);
    weapon.ammo_in_clip = 1;
    weapon.start_reload(&mut ctx);
    for _ in 0..10 {
        weapon.update(SIM_DT, &mut ctx);
    }
    // Indicator is far from center this early: a miss
    assert_eq!(weapon.attempt_active_reload(&mut ctx), ReloadOutcome::ActiveFailed);
    let elapsed = weapon.reload.elapsed;
    let indicator = weapon.reload.indicator;

    assert_eq!(weapon.start_reload(&mut ctx), ReloadOutcome::AlreadyReloading);
    assert_eq!(weapon.reload.elapsed, elapsed);
    assert!(weapon.reload.attempt_made());

    // Frozen indicator after the attempt
    weapon.update(SIM_DT * 5.0, &mut ctx);
    assert_eq!(weapon.reload.indicator, indicator);
}

#[test]
fn active_reload_window_edges() {
    let mut ctx = ctx();
    let half = Weapon::default().reload_area() / 2.0;

    let mut inside = five_round_weapon(20);
    inside.ammo_in_clip = 0;
    inside.start_reload(&mut ctx);
    inside.reload.indicator = ACTIVE_RELOAD_CENTER + half;
    assert_eq!(inside.attempt_active_reload(&mut ctx), ReloadOutcome::ActiveSuccess);
    assert!(!inside.is_reloading());
    assert_eq!(inside.ammo_in_clip, 5);

    let mut outside = five_round_weapon(20);
    outside.ammo_in_clip = 0;
    outside.start_reload(&mut ctx);
    outside.reload.indicator = ACTIVE_RELOAD_CENTER - half - 1.0;
    assert_eq!(outside.attempt_active_reload(&mut ctx), ReloadOutcome::ActiveFailed);
    assert!(outside.is_reloading());
    assert_eq!(outside.ammo_in_clip, 0);
}

#[test]
fn two_hits_kill_once_with_distance_bonus() {
    let mut ctx = ctx();
    let mut player = Player::default();
    let mut manager = EnemyManager::new();
    let start = player.position + Vec3::new(0.0, 0.0, 10.0);
    let id = manager.spawn_at(EnemyKind::Normal, start, &mut ctx);

    let outcome = manager.hit(id, 1.0, Some(&mut player), &mut ctx);
    assert_eq!(outcome, HitOutcome::Hurt);
    assert_eq!(manager.get(id).map(|e| e.health()), Some(1.0));
    assert_eq!(manager.roster_of(id), Some(Roster::Alive));
    assert!(ctx.events.contains(&GameEvent::Hurt { id }));

    let outcome = manager.hit(id, 1.0, Some(&mut player), &mut ctx);
    assert_eq!(outcome, HitOutcome::Killed);
    assert_eq!(manager.roster_of(id), Some(Roster::Dying));
    let enemy = manager.get(id).unwrap();
    assert_eq!(enemy.health(), 0.0);
    assert!(!enemy.is_alive());
    assert!(enemy.is_dying());
    // 100 base + round(50 * 10 / 60)
    assert_eq!(enemy.score_awarded, 108);

    // Dead actors take no further hits
    assert_eq!(manager.hit(id, 1.0, Some(&mut player), &mut ctx), HitOutcome::Ignored);
    let kills = ctx
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::Killed { .. }))
        .count();
    assert_eq!(kills, 1);
}

#[test]
fn charger_award_depends_on_phase() {
    let mut ctx = ctx();
    let mut manager = EnemyManager::new();
    let mut weapon = Weapon::default();
    let charging = manager.spawn_at(EnemyKind::Charger, Vec3::new(0.0, 0.0, 55.0), &mut ctx);
    let is_charging = |manager: &EnemyManager| {
        matches!(
            manager.get(charging).map(|e| &e.behavior),
            Some(Behavior::Charger {
                phase: ChargePhase::Charging,
                ..
            })
        )
    };
    for _ in 0..(8.0 / SIM_DT) as usize {
        if is_charging(&manager) {
            break;
        }
        manager.update(&mut weapon, None, &mut ctx, SIM_DT);
    }
    assert!(is_charging(&manager), "charger never started its charge");
    assert!(manager.kill(charging, None, &mut ctx));
    assert!(!ctx.awards.has(Award::StoppedCharger));

    let strutting = manager.spawn_at(EnemyKind::Charger, Vec3::new(0.0, 0.0, 40.0), &mut ctx);
    assert!(matches!(
        manager.get(strutting).map(|e| &e.behavior),
        Some(Behavior::Charger {
            phase: ChargePhase::Strutting,
            countdown,
        }) if *countdown > 0.0
    ));
    assert!(manager.kill(strutting, None, &mut ctx));
    assert!(ctx.awards.has(Award::StoppedCharger));
}

#[test]
fn teleporter_cannot_be_hit_while_invisible() {
    let mut ctx = ctx();
    let mut manager = EnemyManager::new();
    let mut weapon = Weapon::default();
    let id = manager.spawn_at(EnemyKind::Teleporter, Vec3::new(0.0, 0.0, 50.0), &mut ctx);
    let is_invisible = |manager: &EnemyManager| {
        matches!(
            manager.get(id).map(|e| &e.behavior),
            Some(Behavior::Teleporter {
                phase: WarpPhase::Invisible,
                ..
            })
        )
    };
    for _ in 0..(8.0 / SIM_DT) as usize {
        if is_invisible(&manager) {
            break;
        }
        manager.update(&mut weapon, None, &mut ctx, SIM_DT);
    }
    assert!(is_invisible(&manager), "teleporter never vanished");

    let (x, z) = manager
        .get(id)
        .map(|e| (e.position.x, e.position.z))
        .unwrap_or_default();
    let mut round = Projectile::aimed(
        Vec3::new(x, 1.4, 0.5),
        Vec3::new(x, 1.4, 80.0),
        80.0,
        ProjectileKind::Standard,
        5.0,
    );
    round.pos.z = z + 1.0;
    weapon.projectiles.push(round);
    manager.update(&mut weapon, None, &mut ctx, 0.0);
    assert_eq!(manager.roster_of(id), Some(Roster::Alive));
    assert_eq!(manager.get(id).map(|e| e.hits_taken), Some(0));
}

#[test]
fn splash_spares_the_struck_actor() {
    let mut ctx = ctx();
    let mut manager = EnemyManager::new();
    let mut weapon = Weapon::default();
    let struck = manager.spawn_at(EnemyKind::Vendor, Vec3::new(0.0, 0.0, 20.0), &mut ctx);
    let near = Vec3::new(0.0, 0.0, 20.0 + EXPLOSION_RADIUS - 0.01);
    let inside = manager.spawn_at(EnemyKind::Normal, near, &mut ctx);
    let edge = Vec3::new(-EXPLOSION_RADIUS, 0.0, 20.0);
    let boundary = manager.spawn_at(EnemyKind::Normal, edge, &mut ctx);

    let mut grenade = Projectile::aimed(
        Vec3::new(0.0, 1.4, 0.5),
        Vec3::new(0.0, 1.4, 80.0),
        80.0,
        ProjectileKind::Explosive,
        1.0,
    );
    grenade.pos.z = 20.5;
    weapon.projectiles.push(grenade);
    manager.update(&mut weapon, None, &mut ctx, 0.0);

    let struck_actor = manager.get(struck).unwrap();
    // Vendor has 3 health: one standard hit, no splash on top
    assert_eq!(struck_actor.health(), 2.0);
    assert_eq!(struck_actor.hits_taken, 1);
    assert_eq!(struck_actor.lighting, 0.0);
    assert!(ctx.events.contains(&GameEvent::Burned { id: struck }));

    assert_eq!(manager.roster_of(inside), Some(Roster::Dying));
    assert_eq!(manager.roster_of(boundary), Some(Roster::Alive));
    assert!(weapon.projectiles[0].remove);
}

#[test]
fn simultaneous_crossings_are_paced() {
    let mut ctx = ctx();
    let mut manager = EnemyManager::new();
    let mut weapon = Weapon::default();
    let mut player = Player::default();
    for lane in 0..4 {
        let at_line = Vec3::new(lane as f32 * 2.0, 0.0, PLAYER_DEPTH);
        manager.spawn_at(EnemyKind::Normal, at_line, &mut ctx);
    }
    let mut escaped_per_tick = Vec::new();
    for _ in 0..4 {
        let before = manager.economy.escapes;
        manager.update(&mut weapon, Some(&mut player), &mut ctx, 0.0);
        escaped_per_tick.push(manager.economy.escapes - before);
    }
    assert_eq!(escaped_per_tick, vec![1, 1, 1, 1]);
    assert_eq!(player.health, PLAYER_MAX_HEALTH - 4);
    let warnings = ctx
        .events
        .iter()
        .filter(|e| **e == GameEvent::EscapeWarning)
        .count();
    assert_eq!(warnings, 4);
}

#[test]
fn accuracy_without_shots_is_full() {
    let manager = EnemyManager::new();
    assert_eq!(manager.economy.shots_fired, 0);
    assert_eq!(manager.economy.hits, 0);
    let accuracy = manager.economy.accuracy();
    assert!(!accuracy.is_nan());
    assert_eq!(accuracy, 100.0);
    assert_eq!(WaveSummary::from_economy(0, &manager.economy).accuracy, 100.0);
}

#[test]
fn thrower_hits_player_from_range() {
    let mut ctx = ctx();
    let mut manager = EnemyManager::new();
    let mut weapon = Weapon::default();
    let mut player = Player::default();
    let id = manager.spawn_at(EnemyKind::Thrower, Vec3::new(0.0, 0.0, 50.0), &mut ctx);

    let mut hit = false;
    let mut saw_throw_in_flight = false;
    for _ in 0..(15.0 / SIM_DT) as usize {
        manager.update(&mut weapon, Some(&mut player), &mut ctx, SIM_DT);
        saw_throw_in_flight |= manager.hostile_projectiles().next().is_some();
        if player.health < PLAYER_MAX_HEALTH {
            hit = true;
            break;
        }
    }
    assert!(hit, "thrower never landed a throw");
    assert!(saw_throw_in_flight);
    assert!(ctx.events.contains(&GameEvent::Thrown { id }));
    assert!(player.hit_pulse > 0.0);
    assert_eq!(manager.roster_of(id), Some(Roster::Alive));
}
