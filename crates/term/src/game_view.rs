//! GameView: maps a core [`Snapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The playfield is sampled onto a character grid: one terminal column covers
//! `unit_w` playfield units and one row covers `unit_h`. The 1:2 default
//! compensates for typical terminal glyph aspect ratio.

use crate::core::geometry::{Bounds, Rect};
use crate::core::Snapshot;
use crate::fb::{Cell, CellRect, CellStyle, FrameBuffer, Rgb};
use crate::types::{Owner, Phase, PowerUpKind};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const FIELD_BG: Rgb = Rgb::new(10, 10, 24);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

pub struct GameView {
    unit_w: i32,
    unit_h: i32,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            unit_w: 10,
            unit_h: 20,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    /// `unit_w` / `unit_h`: playfield units per terminal column / row.
    pub fn new(unit_w: i32, unit_h: i32) -> Self {
        Self {
            unit_w: unit_w.max(1),
            unit_h: unit_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Character grid covering `playfield`.
    pub fn grid_size(&self, playfield: Bounds) -> (u16, u16) {
        let cols = (playfield.width + self.unit_w - 1) / self.unit_w;
        let rows = (playfield.height + self.unit_h - 1) / self.unit_h;
        (
            cols.clamp(1, u16::MAX as i32) as u16,
            rows.clamp(1, u16::MAX as i32) as u16,
        )
    }

    /// Render into an existing framebuffer.
    ///
    /// Callers can reuse one framebuffer across frames; it is resized to the
    /// viewport when needed.
    pub fn render_into(&self, snap: &Snapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::BLANK);

        let (grid_w, grid_h) = self.grid_size(snap.playfield);
        let frame_w = grid_w + 2;
        let frame_h = grid_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w + PANEL_WIDTH) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        let origin = (start_x + 1, start_y + 1);
        let field = CellRect::new(origin.0, origin.1, grid_w, grid_h);

        let bg = CellStyle::new(Rgb::new(60, 60, 80), FIELD_BG);
        fb.fill(field, Cell::new(' ', bg));
        draw_border(
            fb,
            start_x,
            start_y,
            frame_w,
            frame_h,
            CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG),
        );

        for cell in &snap.barriers {
            let style = if cell.health > 1 {
                CellStyle::new(Rgb::new(90, 220, 90), FIELD_BG)
            } else {
                CellStyle::new(Rgb::new(60, 170, 60), FIELD_BG)
            };
            self.draw_rect(fb, origin, snap.playfield, cell.rect, '▓', style);
        }

        for inv in &snap.invaders {
            let (ch, fg) = invader_glyph(inv.row, snap.anim_frame);
            self.draw_rect(fb, origin, snap.playfield, inv.rect, ch, CellStyle::new(fg, FIELD_BG).bold());
        }

        if let Some(saucer) = &snap.saucer {
            let style = CellStyle::new(Rgb::new(240, 70, 70), FIELD_BG).bold();
            self.draw_rect(fb, origin, snap.playfield, saucer.rect, '◉', style);
        }

        if let Some(heavy) = &snap.heavy {
            // Fades as it takes damage.
            let ch = if heavy.health * 2 > heavy.max_health { '█' } else { '▒' };
            let style = CellStyle::new(Rgb::new(250, 140, 40), FIELD_BG).bold();
            self.draw_rect(fb, origin, snap.playfield, heavy.rect, ch, style);
        }

        for pickup in &snap.power_ups {
            let style = CellStyle::new(Rgb::new(255, 230, 60), FIELD_BG).bold();
            self.draw_rect(fb, origin, snap.playfield, pickup.rect, pickup_glyph(pickup.kind), style);
        }

        for bullet in &snap.bullets {
            let (ch, fg) = match bullet.owner {
                Owner::Player if bullet.strong => ('┃', Rgb::new(255, 120, 255)),
                Owner::Player => ('│', Rgb::new(255, 255, 255)),
                Owner::Invader => ('¦', Rgb::new(250, 210, 80)),
            };
            self.draw_rect(fb, origin, snap.playfield, bullet.rect, ch, CellStyle::new(fg, FIELD_BG));
        }

        let shielded = snap
            .player
            .power
            .is_some_and(|p| p.kind == PowerUpKind::Shield);
        let player_fg = if shielded {
            Rgb::new(255, 230, 60)
        } else {
            Rgb::new(80, 220, 240)
        };
        let player_style = CellStyle::new(player_fg, FIELD_BG).bold();
        let player_style = if snap.player.alive {
            player_style
        } else {
            player_style.dim()
        };
        self.draw_rect(fb, origin, snap.playfield, snap.player.rect, '▲', player_style);

        draw_side_panel(fb, snap, viewport, start_x, start_y, frame_w);

        let overlay = if snap.paused {
            Some("PAUSED")
        } else {
            match snap.phase {
                Phase::Playing => None,
                Phase::PlayerHit => Some("HIT!"),
                Phase::LevelClear => Some("LEVEL CLEAR"),
                Phase::GameOver => Some("GAME OVER"),
                Phase::Win => Some("YOU WIN"),
            }
        };
        if let Some(text) = overlay {
            draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &Snapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Cells covered by `rect`, clipped to the playfield. `None` when fully outside.
    pub fn span(&self, playfield: Bounds, rect: Rect) -> Option<CellRect> {
        let left = rect.left().max(0);
        let right = rect.right().min(playfield.width);
        let top = rect.top().max(0);
        let bottom = rect.bottom().min(playfield.height);
        if left >= right || top >= bottom {
            return None;
        }

        let x0 = left / self.unit_w;
        let x1 = (right - 1) / self.unit_w;
        let y0 = top / self.unit_h;
        let y1 = (bottom - 1) / self.unit_h;
        Some(CellRect::new(
            x0 as u16,
            y0 as u16,
            (x1 - x0 + 1) as u16,
            (y1 - y0 + 1) as u16,
        ))
    }

    fn draw_rect(
        &self,
        fb: &mut FrameBuffer,
        origin: (u16, u16),
        playfield: Bounds,
        rect: Rect,
        ch: char,
        style: CellStyle,
    ) {
        if let Some(area) = self.span(playfield, rect) {
            fb.fill(area.offset(origin.0, origin.1), Cell::new(ch, style));
        }
    }
}

const PANEL_WIDTH: u16 = 16;

fn invader_glyph(row: u16, frame: u8) -> (char, Rgb) {
    let alt = frame % 2 == 1;
    match row {
        0 => (if alt { '▽' } else { '▼' }, Rgb::new(220, 120, 230)),
        1 | 2 => (if alt { '◇' } else { '◆' }, Rgb::new(90, 200, 240)),
        _ => (if alt { '○' } else { '●' }, Rgb::new(120, 230, 120)),
    }
}

fn pickup_glyph(kind: PowerUpKind) -> char {
    match kind {
        PowerUpKind::StrongMissile => 'M',
        PowerUpKind::Shield => 'S',
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    let (right, bottom) = (x + w - 1, y + h - 1);
    fb.fill(CellRect::new(x + 1, y, w - 2, 1), Cell::new('─', style));
    fb.fill(CellRect::new(x + 1, bottom, w - 2, 1), Cell::new('─', style));
    fb.fill(CellRect::new(x, y + 1, 1, h - 2), Cell::new('│', style));
    fb.fill(CellRect::new(right, y + 1, 1, h - 2), Cell::new('│', style));
    for (cx, cy, ch) in [(x, y, '┌'), (right, y, '┐'), (x, bottom, '└'), (right, bottom, '┘')] {
        fb.set(cx, cy, Cell::new(ch, style));
    }
}

fn draw_side_panel(
    fb: &mut FrameBuffer,
    snap: &Snapshot,
    viewport: Viewport,
    start_x: u16,
    start_y: u16,
    frame_w: u16,
) {
    let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
    if panel_x >= viewport.width || viewport.width - panel_x < 10 {
        return;
    }

    let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
    let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
    let hint = value.dim();

    let mut y = start_y;
    for (name, n) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LIVES", snap.lives)] {
        fb.text(panel_x, y, name, label);
        fb.number(panel_x, y.saturating_add(1), n, value);
        y = y.saturating_add(3);
    }

    fb.text(panel_x, y, "LEFT", label);
    fb.number(panel_x, y.saturating_add(1), snap.remaining_invaders as u32, value);
    y = y.saturating_add(3);

    fb.text(panel_x, y, "STATE", label);
    let state = if snap.paused { "paused" } else { snap.phase.as_str() };
    fb.text(panel_x, y.saturating_add(1), state, value);
    y = y.saturating_add(3);

    if let Some(power) = snap.player.power {
        fb.text(panel_x, y, "POWER", label);
        fb.text(panel_x, y.saturating_add(1), power.kind.as_str(), value);
        fb.number(panel_x, y.saturating_add(2), power.ticks_left, hint);
        y = y.saturating_add(4);
    }

    for line in ["<- -> move", "space fire", "p pause", "r restart", "q quit"] {
        if y >= viewport.height {
            break;
        }
        fb.text(panel_x, y, line, hint);
        y = y.saturating_add(1);
    }
}

fn draw_overlay_text(
    fb: &mut FrameBuffer,
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
    text: &str,
) {
    let mid_y = start_y.saturating_add(frame_h / 2);
    let text_w = text.chars().count() as u16;
    let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
    fb.text(x, mid_y, text, style);
}
