//! Text rendering of snapshots

use invaders::core::{GameSession, SimConfig, Snapshot};
use invaders::term::{AnchorY, FrameBuffer, GameView, Viewport};
use invaders::types::{Intent, Owner};

fn snapshot() -> Snapshot {
    GameSession::new(SimConfig::default()).unwrap().snapshot()
}

fn ch(fb: &FrameBuffer, x: u16, y: u16) -> char {
    fb.get(x, y).map(|c| c.ch).unwrap_or('?')
}

/// Field 60x30 cells plus border, panel to the right.
fn render(snap: &Snapshot) -> FrameBuffer {
    GameView::default()
        .with_anchor_y(AnchorY::Top)
        .render(snap, Viewport::new(78, 32))
}

#[test]
fn test_border_encloses_the_field() {
    let fb = render(&snapshot());
    assert_eq!(ch(&fb, 0, 0), '┌');
    assert_eq!(ch(&fb, 61, 0), '┐');
    assert_eq!(ch(&fb, 0, 31), '└');
    assert_eq!(ch(&fb, 61, 31), '┘');
}

#[test]
fn test_player_is_drawn_at_the_bottom() {
    let fb = render(&snapshot());
    // Player spans x 285..315, y 560..580 in playfield units.
    for x in 29..=32 {
        assert_eq!(ch(&fb, x, 29), '▲', "x = {x}");
    }
    assert_ne!(ch(&fb, 28, 29), '▲');
    assert_ne!(ch(&fb, 33, 29), '▲');
}

#[test]
fn test_every_invader_is_visible() {
    let snap = snapshot();
    let fb = render(&snap);
    let view = GameView::default();
    for inv in &snap.invaders {
        let area = view.span(snap.playfield, inv.rect).unwrap();
        let glyph = ch(&fb, area.x + 1, area.y + 1);
        assert!(
            matches!(glyph, '▼' | '▽' | '◆' | '◇' | '●' | '○'),
            "invader {:?} drawn as {glyph:?}",
            inv.id
        );
    }
}

#[test]
fn test_panel_shows_score_and_lives() {
    let fb = render(&snapshot());
    let text: String = (0..fb.height()).map(|y| fb.row_string(y)).collect();
    assert!(text.contains("SCORE"));
    assert!(text.contains("LIVES"));
}

#[test]
fn test_pause_overlay() {
    let mut snap = snapshot();
    snap.paused = true;
    let fb = render(&snap);
    let text: String = (0..fb.height()).map(|y| fb.row_string(y)).collect();
    assert!(text.contains("PAUSED"));
}

#[test]
fn test_player_bullet_is_drawn() {
    let mut session = GameSession::new(SimConfig::default()).unwrap();
    session.step(&[Intent::Fire]).unwrap();
    let snap = session.snapshot();
    let fb = render(&snap);

    let bullet = snap.bullets_of(Owner::Player).next().unwrap();
    let area = GameView::default().span(snap.playfield, bullet.rect).unwrap();
    assert_eq!(ch(&fb, area.x + 1, area.y + 1), '│');
}

#[test]
fn test_tiny_viewport_does_not_panic() {
    let fb = GameView::default().render(&snapshot(), Viewport::new(5, 3));
    assert_eq!((fb.width(), fb.height()), (5, 3));
}
