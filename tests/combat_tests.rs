//! Collision rules through the public store API

use invaders::core::combat::{erode_barriers, resolve};
use invaders::core::{EntityStore, Rect, SimConfig};
use invaders::core::store::ActivePower;
use invaders::types::{EntityKind, HorizontalDirection, Owner, PowerUpKind};

fn setup() -> (SimConfig, EntityStore) {
    let mut cfg = SimConfig::default();
    cfg.score_multiplier_percent = 100;
    let store = EntityStore::new(&cfg);
    (cfg, store)
}

fn bullet_on_player(store: &mut EntityStore, dx: i32) {
    let p = store.player().rect;
    store
        .add_bullet(Owner::Invader, Rect::new(p.x + dx, p.y, 4, 12), 5)
        .unwrap();
}

#[test]
fn test_two_simultaneous_hits_cost_two_lives() {
    let (cfg, mut store) = setup();
    bullet_on_player(&mut store, 0);
    bullet_on_player(&mut store, 10);
    store.remove_dead();

    let report = resolve(&mut store, &cfg, 1);
    assert!(report.player_hit);
    assert_eq!(report.lives_lost, 2);
    assert_eq!(store.player().lives, cfg.player.starting_lives - 2);
    assert!(store.player().alive);
}

#[test]
fn test_hits_after_the_last_life_are_no_ops() {
    let (cfg, mut store) = setup();
    store.player_mut().lives = 1;
    bullet_on_player(&mut store, 0);
    bullet_on_player(&mut store, 10);
    store.remove_dead();

    let report = resolve(&mut store, &cfg, 1);
    assert_eq!(report.lives_lost, 1);
    assert_eq!(store.player().lives, 0);
    assert!(!store.player().alive);
}

#[test]
fn test_dead_entities_leave_iteration_at_the_tick_boundary() {
    let (cfg, mut store) = setup();
    store.spawn_invader_grid(&cfg, 1, 3, 1);
    let target = store.invaders()[1].rect;
    store
        .add_bullet(Owner::Player, Rect::new(target.x + 5, target.y + 5, 4, 12), -12)
        .unwrap();
    store.remove_dead();

    let report = resolve(&mut store, &cfg, 1);
    assert_eq!(report.invaders_destroyed, 1);
    assert_eq!(report.score_delta, 30);

    store.remove_dead();
    assert_eq!(store.iter_alive(EntityKind::Invader).count(), 2);
    assert_eq!(store.iter_alive(EntityKind::PlayerBullet).count(), 0);
    assert_eq!(store.invaders().len(), 2);
}

#[test]
fn test_player_and_invader_bullets_can_both_die_in_one_tick() {
    let (cfg, mut store) = setup();
    store.spawn_invader_grid(&cfg, 1, 1, 1);
    let inv = store.invaders()[0].rect;
    store
        .add_bullet(Owner::Player, Rect::new(inv.x, inv.y, 4, 12), -12)
        .unwrap();
    bullet_on_player(&mut store, 0);
    store.remove_dead();

    let report = resolve(&mut store, &cfg, 1);
    assert_eq!(report.invaders_destroyed, 1);
    assert!(report.player_hit);
    assert!(store.bullets().iter().all(|b| !b.alive));
}

#[test]
fn test_invader_bullet_hits_barrier_before_player() {
    let (cfg, mut store) = setup();
    store.spawn_barriers(&cfg);
    let cell = store.barriers()[0].rect;
    store
        .add_bullet(Owner::Invader, Rect::new(cell.x, cell.y, 4, 12), 5)
        .unwrap();
    store.remove_dead();

    let before = store.iter_alive(EntityKind::BarrierCell).count();
    let report = resolve(&mut store, &cfg, 1);
    assert!(!report.player_hit);
    assert_eq!(store.iter_alive(EntityKind::BarrierCell).count(), before - 1);
}

#[test]
fn test_invaders_without_barrier_contact_erode_nothing() {
    let (cfg, mut store) = setup();
    store.spawn_invader_grid(&cfg, 5, 10, 1);
    store.spawn_barriers(&cfg);
    assert_eq!(erode_barriers(&mut store), 0);
}

#[test]
fn test_strong_missiles_bring_down_the_heavy_invader() {
    let (cfg, mut store) = setup();
    let rect = Rect::new(300, 4, 48, 24);
    store
        .spawn_heavy(rect, HorizontalDirection::Left, 6, 200)
        .unwrap();
    store.remove_dead();

    let mut hits = 0;
    while store.heavy().is_some() {
        store.clear_bullets(Some(Owner::Player));
        store
            .add_strong_bullet(Rect::new(rect.x + 20, rect.y + 6, 4, 12), -12)
            .unwrap();
        store.remove_dead();
        let report = resolve(&mut store, &cfg, 1);
        hits += report.heavy_hits;
        store.remove_dead();
    }
    // 6 health at 3 damage per strong hit.
    assert_eq!(hits, 2);
    assert_eq!(store.player().score, 2 * cfg.heavy.hit_points + 200);
}

#[test]
fn test_shield_saves_a_life_only_once() {
    let (cfg, mut store) = setup();
    store.player_mut().power = Some(ActivePower {
        kind: PowerUpKind::Shield,
        ticks_left: 60,
    });
    bullet_on_player(&mut store, 0);
    bullet_on_player(&mut store, 10);
    store.remove_dead();

    let report = resolve(&mut store, &cfg, 1);
    assert!(report.shield_absorbed);
    assert_eq!(report.lives_lost, 1);
    assert_eq!(store.player().lives, cfg.player.starting_lives - 1);
    assert_eq!(store.player().power, None);
}

#[test]
fn test_pickup_falls_out_of_play_when_missed() {
    let (cfg, mut store) = setup();
    store
        .add_power_up(PowerUpKind::StrongMissile, Rect::new(0, 590, 20, 20))
        .unwrap();
    store.remove_dead();

    let report = resolve(&mut store, &cfg, 1);
    assert_eq!(report.power_up_collected, None);
    store.remove_dead();
    assert_eq!(store.iter_alive(EntityKind::PowerUp).count(), 0);
}
