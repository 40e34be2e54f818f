//! Fixed-timestep driver behaviour

use std::time::Duration;

use invaders::core::{ConfigError, LoopDriver, SimConfig, SimError};
use invaders::types::{Intent, Phase};

fn driver() -> LoopDriver {
    LoopDriver::new(SimConfig::default()).unwrap()
}

#[test]
fn test_sub_nanosecond_tick_rate_is_refused() {
    let mut cfg = SimConfig::default();
    cfg.tick_rate_hz = 2_000_000_000;
    assert!(matches!(
        LoopDriver::new(cfg),
        Err(SimError::InvalidConfiguration(ConfigError::TickRateTooHigh { .. }))
    ));
}

#[test]
fn test_fastest_valid_tick_rate_still_advances() {
    let mut cfg = SimConfig::default();
    cfg.tick_rate_hz = 1_000_000_000;
    cfg.max_catch_up_ticks = 5;
    let mut d = LoopDriver::new(cfg).unwrap();
    assert_eq!(d.tick_duration(), Duration::from_nanos(1));
    assert_eq!(d.advance(Duration::from_millis(1)), 5);
}

#[test]
fn test_one_tick_per_tick_duration() {
    let mut d = driver();
    let dt = d.tick_duration();
    for expected in 1..=20 {
        assert_eq!(d.advance(dt), 1);
        assert_eq!(d.session().elapsed_ticks(), expected);
    }
}

#[test]
fn test_outcome_does_not_depend_on_frame_rate() {
    let mut fast = driver();
    let mut slow = driver();

    for _ in 0..3_000 {
        fast.advance(Duration::from_millis(1));
    }
    for _ in 0..60 {
        slow.advance(Duration::from_millis(50));
    }

    assert_eq!(fast.session().elapsed_ticks(), 180);
    assert_eq!(*fast.snapshot(), *slow.snapshot());
}

#[test]
fn test_fractional_seconds_accumulate() {
    let mut d = driver();
    let third = 1.0 / 180.0;
    let ticks: u32 = (0..180).map(|_| d.tick(third)).sum();
    assert!((59..=60).contains(&ticks), "ticks = {ticks}");
}

#[test]
fn test_bad_deltas_count_as_zero() {
    let mut d = driver();
    assert_eq!(d.tick(-1.0), 0);
    assert_eq!(d.tick(f64::NAN), 0);
    assert_eq!(d.tick(f64::INFINITY), 0);
    assert_eq!(d.session().elapsed_ticks(), 0);
}

#[test]
fn test_long_stall_is_capped() {
    let mut d = driver();
    let cap = d.config().max_catch_up_ticks;
    assert_eq!(d.advance(Duration::from_secs(30)), cap);
    // The surplus was discarded, not banked.
    assert!(d.advance(Duration::ZERO) <= 1);
}

#[test]
fn test_pause_freezes_the_simulation() {
    let mut d = driver();
    let dt = d.tick_duration();
    d.advance(dt * 5);

    d.submit_intent(Intent::Pause);
    assert_eq!(d.advance(dt * 100), 0);
    assert!(d.is_paused());
    assert!(d.snapshot().paused);
    assert_eq!(d.snapshot().tick, 5);

    d.submit_intent(Intent::Resume);
    assert_eq!(d.advance(dt), 1);
    assert!(!d.snapshot().paused);
}

#[test]
fn test_gameplay_intents_apply_on_the_next_tick() {
    let mut d = driver();
    let dt = d.tick_duration();
    let x0 = d.snapshot().player.rect.x;

    d.submit_intent(Intent::MoveLeft);
    d.advance(dt);
    assert!(d.snapshot().player.rect.x < x0);
}

#[test]
fn test_restart_starts_a_fresh_session() {
    let mut d = driver();
    let dt = d.tick_duration();
    d.advance(dt * 10);

    d.submit_intent(Intent::Restart);
    d.advance(Duration::ZERO);
    let snap = d.snapshot();
    assert_eq!(snap.tick, 0);
    assert_eq!(snap.phase, Phase::Playing);
    assert_eq!(snap.level, 1);
}

#[test]
fn test_snapshot_is_shared_until_the_next_tick() {
    let mut d = driver();
    let a = d.snapshot();
    d.advance(Duration::from_millis(1));
    let b = d.snapshot();
    assert!(std::sync::Arc::ptr_eq(&a, &b));

    d.advance(d.tick_duration());
    assert!(!std::sync::Arc::ptr_eq(&a, &d.snapshot()));
}
