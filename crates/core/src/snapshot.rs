//! Read-only render snapshot.
//!
//! A [`Snapshot`] is an owned copy of everything a view needs to draw one
//! frame. The loop driver shares it as `Arc<Snapshot>`, so handing it to a view
//! is a pointer copy and nothing a view does can reach back into the session.

use serde::Serialize;

use crate::geometry::{Bounds, Rect};
use crate::session::GameSession;
use crate::store::{ActivePower, EntityId};
use crate::types::{Owner, Phase, PowerUpKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    pub alive: bool,
    pub fire_ready: bool,
    pub power: Option<ActivePower>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvaderView {
    pub id: EntityId,
    pub rect: Rect,
    pub row: u16,
    pub col: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulletView {
    pub id: EntityId,
    pub owner: Owner,
    pub rect: Rect,
    pub strong: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BarrierView {
    pub id: EntityId,
    pub rect: Rect,
    pub health: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaucerView {
    pub id: EntityId,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeavyView {
    pub id: EntityId,
    pub rect: Rect,
    pub health: u8,
    pub max_health: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerUpView {
    pub id: EntityId,
    pub rect: Rect,
    pub kind: PowerUpKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: Phase,
    pub paused: bool,
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    pub remaining_invaders: usize,
    /// Ticks left in a timed phase (`PlayerHit`, `LevelClear`), else 0.
    pub phase_ticks_left: u32,
    pub anim_frame: u8,
    pub playfield: Bounds,
    pub player: PlayerView,
    pub invaders: Vec<InvaderView>,
    pub bullets: Vec<BulletView>,
    pub barriers: Vec<BarrierView>,
    pub saucer: Option<SaucerView>,
    pub heavy: Option<HeavyView>,
    pub power_ups: Vec<PowerUpView>,
}

impl Snapshot {
    /// Copy the state of `session` as of its last completed tick.
    pub fn capture(session: &GameSession) -> Self {
        let store = session.store();
        let player = store.player();

        Self {
            tick: session.elapsed_ticks(),
            phase: session.phase(),
            paused: false,
            level: session.level(),
            score: player.score,
            lives: player.lives,
            remaining_invaders: store.alive_invader_count(),
            phase_ticks_left: session.phase_ticks_left(),
            anim_frame: session.formation().anim_frame(),
            playfield: session.config().playfield,
            player: PlayerView {
                rect: player.rect,
                alive: player.alive,
                fire_ready: player.fire_cooldown == 0,
                power: player.power,
            },
            invaders: store
                .invaders()
                .iter()
                .filter(|i| i.alive)
                .map(|i| InvaderView {
                    id: i.id,
                    rect: i.rect,
                    row: i.row,
                    col: i.col,
                })
                .collect(),
            bullets: store
                .bullets()
                .iter()
                .filter(|b| b.alive)
                .map(|b| BulletView {
                    id: b.id,
                    owner: b.owner,
                    rect: b.rect,
                    strong: b.strong,
                })
                .collect(),
            barriers: store
                .barriers()
                .iter()
                .filter(|c| c.alive)
                .map(|c| BarrierView {
                    id: c.id,
                    rect: c.rect,
                    health: c.health,
                })
                .collect(),
            saucer: store.saucer().map(|s| SaucerView {
                id: s.id,
                rect: s.rect,
            }),
            heavy: store.heavy().map(|h| HeavyView {
                id: h.id,
                rect: h.rect,
                health: h.health,
                max_health: h.max_health,
            }),
            power_ups: store
                .power_ups()
                .iter()
                .filter(|u| u.alive)
                .map(|u| PowerUpView {
                    id: u.id,
                    rect: u.rect,
                    kind: u.kind,
                })
                .collect(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn bullets_of(&self, owner: Owner) -> impl Iterator<Item = &BulletView> + '_ {
        self.bullets.iter().filter(move |b| b.owner == owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn capture_reflects_fresh_session() {
        let cfg = SimConfig::default();
        let session = GameSession::new(cfg.clone()).unwrap();
        let snap = Snapshot::capture(&session);

        assert_eq!(snap.tick, 0);
        assert_eq!(snap.phase, Phase::Playing);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.lives, cfg.player.starting_lives);
        assert_eq!(
            snap.invaders.len(),
            cfg.formation.rows as usize * cfg.formation.cols as usize
        );
        assert_eq!(snap.remaining_invaders, snap.invaders.len());
        assert!(snap.bullets.is_empty());
        assert!(snap.player.fire_ready);
        assert!(snap.heavy.is_none());
        assert!(snap.power_ups.is_empty());
        assert_eq!(snap.player.power, None);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let session = GameSession::new(SimConfig::default()).unwrap();
        let json = serde_json::to_value(Snapshot::capture(&session)).unwrap();
        assert_eq!(json["phase"], "playing");
        assert_eq!(json["level"], 1);
        assert!(json["invaders"].is_array());
    }
}
