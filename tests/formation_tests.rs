//! Formation movement through the public API

use invaders::core::{EntityStore, SimConfig};
use invaders::types::HorizontalDirection;

fn extent(store: &EntityStore) -> (i32, i32) {
    let alive = store.invaders().iter().filter(|i| i.alive);
    let left = alive.clone().map(|i| i.rect.left()).min().unwrap();
    let right = alive.map(|i| i.rect.right()).max().unwrap();
    (left, right)
}

#[test]
fn test_formation_reverses_exactly_at_the_bound() {
    let cfg = SimConfig::default();
    let mut store = EntityStore::new(&cfg);
    let mut formation = store.spawn_invader_grid(&cfg, 5, 10, 1);
    let mut saw_right_wall = false;
    let mut saw_left_wall = false;

    for _ in 0..2_000 {
        let (left, right) = extent(&store);
        let top = store.invaders()[0].rect.y;
        let dir = formation.direction();

        let delta = formation.advance(&mut store, &cfg, 1);
        let (new_left, new_right) = extent(&store);
        assert!(new_left >= 0 && new_right <= cfg.playfield.width);

        let at_wall = match dir {
            HorizontalDirection::Right => right == cfg.playfield.width,
            HorizontalDirection::Left => left == 0,
        };
        if at_wall {
            saw_right_wall |= dir == HorizontalDirection::Right;
            saw_left_wall |= dir == HorizontalDirection::Left;
            assert!(delta.reversed);
            assert_eq!(delta.dx, 0);
            assert_eq!(store.invaders()[0].rect.y, top + cfg.formation.descent);
            assert_eq!(formation.direction(), dir.reversed());
        } else {
            assert!(!delta.reversed);
            assert_eq!(delta.dy, 0);
        }

        if delta.invaded {
            break;
        }
    }

    assert!(saw_right_wall && saw_left_wall);
}

#[test]
fn test_formation_eventually_invades() {
    let cfg = SimConfig::default();
    let mut store = EntityStore::new(&cfg);
    let mut formation = store.spawn_invader_grid(&cfg, 5, 10, 1);

    let invaded = (0..20_000).any(|_| formation.advance(&mut store, &cfg, 1).invaded);
    assert!(invaded);
    let lowest = store.invaders().iter().map(|i| i.rect.bottom()).max().unwrap();
    assert!(lowest >= cfg.invasion_line());
}

#[test]
fn test_multi_tick_advance_matches_single_ticks() {
    let cfg = SimConfig::default();
    let mut a = EntityStore::new(&cfg);
    let mut b = EntityStore::new(&cfg);
    let mut fa = a.spawn_invader_grid(&cfg, 3, 6, 1);
    let mut fb = b.spawn_invader_grid(&cfg, 3, 6, 1);

    fa.advance(&mut a, &cfg, 250);
    for _ in 0..250 {
        fb.advance(&mut b, &cfg, 1);
    }

    let rects = |s: &EntityStore| s.invaders().iter().map(|i| i.rect).collect::<Vec<_>>();
    assert_eq!(rects(&a), rects(&b));
    assert_eq!(fa, fb);
}
