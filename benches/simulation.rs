use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use invaders::core::combat::resolve;
use invaders::core::{EntityStore, GameSession, LoopDriver, SimConfig};
use invaders::term::{FrameBuffer, GameView, Viewport};
use invaders::types::Intent;

fn bench_session_step(c: &mut Criterion) {
    c.bench_function("session_step", |b| {
        let mut session = GameSession::new(SimConfig::default()).unwrap();
        let intents = [Intent::Fire, Intent::MoveRight];
        b.iter(|| {
            if session.step(black_box(&intents)).is_err() {
                session = GameSession::new(SimConfig::default()).unwrap();
            }
        })
    });
}

fn bench_driver_advance(c: &mut Criterion) {
    c.bench_function("driver_advance_frame", |b| {
        let mut driver = LoopDriver::new(SimConfig::default()).unwrap();
        b.iter(|| {
            driver.submit_intent(Intent::Fire);
            black_box(driver.advance(Duration::from_millis(16)));
            if driver.snapshot().is_terminal() {
                driver.submit_intent(Intent::Restart);
            }
        })
    });
}

fn bench_resolve(c: &mut Criterion) {
    let cfg = SimConfig::default();
    let mut store = EntityStore::new(&cfg);
    store.spawn_invader_grid(&cfg, cfg.formation.rows, cfg.formation.cols, 1);
    store.spawn_barriers(&cfg);

    c.bench_function("resolve_full_formation", |b| {
        b.iter(|| {
            let mut store = store.clone();
            black_box(resolve(&mut store, &cfg, 1));
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let session = GameSession::new(SimConfig::default()).unwrap();
    c.bench_function("snapshot_capture", |b| {
        b.iter(|| black_box(session.snapshot()))
    });
}

fn bench_render(c: &mut Criterion) {
    let snap = GameSession::new(SimConfig::default()).unwrap().snapshot();
    let view = GameView::default();
    let viewport = Viewport::new(100, 40);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    c.bench_function("game_view_render_into", |b| {
        b.iter(|| view.render_into(black_box(&snap), viewport, &mut fb))
    });
}

criterion_group!(
    benches,
    bench_session_step,
    bench_driver_advance,
    bench_resolve,
    bench_snapshot,
    bench_render
);
criterion_main!(benches);
