//! The two front ends. Both implement [`SnapshotView`] and nothing else:
//! the controller cannot tell them apart.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::terminal;
use serde::Serialize;

use crate::core::ports::SnapshotView;
use crate::core::Snapshot;
use crate::fb::FrameBuffer;
use crate::game_view::{GameView, Viewport};
use crate::types::PowerUpKind;
use crate::renderer::TerminalRenderer;
use crate::types::Phase;

/// Interactive text front end.
pub struct TerminalView {
    view: GameView,
    renderer: TerminalRenderer,
    fb: FrameBuffer,
    viewport: Viewport,
    entered: bool,
}

impl TerminalView {
    pub fn new(view: GameView) -> Self {
        Self {
            view,
            renderer: TerminalRenderer::new(),
            fb: FrameBuffer::new(0, 0),
            viewport: Viewport::new(0, 0),
            entered: false,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        self.renderer.enter().context("failed to initialise terminal")?;
        self.entered = true;
        Ok(())
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        self.renderer.exit().context("failed to restore terminal")
    }
}

impl SnapshotView for TerminalView {
    type Error = anyhow::Error;

    fn present(&mut self, snapshot: &Snapshot) -> Result<()> {
        let (w, h) = terminal::size().context("failed to query terminal size")?;
        let viewport = Viewport::new(w, h);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.renderer.invalidate();
        }
        self.view.render_into(snapshot, viewport, &mut self.fb);
        self.renderer.draw_swap(&mut self.fb)
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

/// Compact per-frame record for [`JsonLinesView`] in summary mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    pub tick: u64,
    pub phase: Phase,
    pub paused: bool,
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    pub remaining_invaders: usize,
    pub bullets: usize,
    pub power: Option<PowerUpKind>,
    pub heavy_health: Option<u8>,
}

impl From<&Snapshot> for SnapshotSummary {
    fn from(s: &Snapshot) -> Self {
        Self {
            tick: s.tick,
            phase: s.phase,
            paused: s.paused,
            level: s.level,
            score: s.score,
            lives: s.lives,
            remaining_invaders: s.remaining_invaders,
            bullets: s.bullets.len(),
            power: s.player.power.map(|p| p.kind),
            heavy_health: s.heavy.map(|h| h.health),
        }
    }
}

/// Headless front end: one JSON document per presented frame.
pub struct JsonLinesView<W: Write = io::Stdout> {
    out: W,
    summary: bool,
    frames: u64,
}

impl JsonLinesView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            summary: false,
            frames: 0,
        }
    }

    /// Emit [`SnapshotSummary`] lines instead of full snapshots.
    pub fn summary_only(mut self) -> Self {
        self.summary = true;
        self
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SnapshotView for JsonLinesView<W> {
    type Error = anyhow::Error;

    fn present(&mut self, snapshot: &Snapshot) -> Result<()> {
        if self.summary {
            serde_json::to_writer(&mut self.out, &SnapshotSummary::from(snapshot))?;
        } else {
            serde_json::to_writer(&mut self.out, snapshot)?;
        }
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.frames += 1;
        Ok(())
    }
}
