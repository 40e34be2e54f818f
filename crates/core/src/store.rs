//! Entity store - sole owner of every live game object
//!
//! The store hands out stable [`EntityId`]s and keeps each family in a vector
//! ordered by ascending id. Nothing outside the store keeps references across
//! ticks; other components hold ids at most, which [`EntityStore::remove_dead`]
//! may invalidate.
//!
//! Spawns requested while a tick is in progress are staged and only become
//! visible to [`EntityStore::iter_alive`] at the next tick boundary, so an
//! iteration started during a tick always sees the same population.

use std::slice;

use serde::Serialize;

use crate::config::SimConfig;
use crate::error::{BulletPool, SimError};
use crate::formation::Formation;
use crate::geometry::Rect;
use crate::types::{points_for_row, EntityKind, HorizontalDirection, Owner, PowerUpKind};

/// Stable identity of a store entity. Ids are never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub rect: Rect,
    pub lives: u32,
    pub score: u32,
    /// Ticks left before the next shot is allowed.
    pub fire_cooldown: u32,
    pub power: Option<ActivePower>,
    pub alive: bool,
}

/// A collected power-up and the ticks it has left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivePower {
    pub kind: PowerUpKind,
    pub ticks_left: u32,
}

impl Player {
    pub fn has_power(&self, kind: PowerUpKind) -> bool {
        self.power.is_some_and(|p| p.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invader {
    pub id: EntityId,
    pub rect: Rect,
    pub row: u16,
    pub col: u16,
    pub points: u32,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bullet {
    pub id: EntityId,
    pub owner: Owner,
    pub rect: Rect,
    /// Vertical velocity in units per tick. Negative travels up.
    pub vy: i32,
    /// Strong missiles pass through formation invaders and the saucer.
    pub strong: bool,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarrierCell {
    pub id: EntityId,
    pub rect: Rect,
    /// Index of the barrier this cell belongs to.
    pub barrier: u16,
    pub health: u8,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saucer {
    pub id: EntityId,
    pub rect: Rect,
    pub direction: HorizontalDirection,
    pub points: u32,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heavy {
    pub id: EntityId,
    pub rect: Rect,
    pub direction: HorizontalDirection,
    pub health: u8,
    pub max_health: u8,
    pub points: u32,
    /// Ticks since the last shot.
    pub fire_timer: u32,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerUp {
    pub id: EntityId,
    pub rect: Rect,
    pub kind: PowerUpKind,
    pub alive: bool,
}

/// Borrowed view of one alive entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef<'a> {
    Invader(&'a Invader),
    Bullet(&'a Bullet),
    BarrierCell(&'a BarrierCell),
    Saucer(&'a Saucer),
    Heavy(&'a Heavy),
    PowerUp(&'a PowerUp),
}

impl EntityRef<'_> {
    pub fn id(&self) -> EntityId {
        match self {
            EntityRef::Invader(e) => e.id,
            EntityRef::Bullet(e) => e.id,
            EntityRef::BarrierCell(e) => e.id,
            EntityRef::Saucer(e) => e.id,
            EntityRef::Heavy(e) => e.id,
            EntityRef::PowerUp(e) => e.id,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            EntityRef::Invader(e) => e.rect,
            EntityRef::Bullet(e) => e.rect,
            EntityRef::BarrierCell(e) => e.rect,
            EntityRef::Saucer(e) => e.rect,
            EntityRef::Heavy(e) => e.rect,
            EntityRef::PowerUp(e) => e.rect,
        }
    }
}

/// Lazy iterator over alive entities of one kind, in ascending id order.
///
/// Call [`EntityStore::iter_alive`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct AliveIter<'a> {
    inner: AliveInner<'a>,
}

#[derive(Debug, Clone)]
enum AliveInner<'a> {
    Invaders(slice::Iter<'a, Invader>),
    Bullets(slice::Iter<'a, Bullet>, Owner),
    Barriers(slice::Iter<'a, BarrierCell>),
    Saucer(Option<&'a Saucer>),
    Heavy(Option<&'a Heavy>),
    PowerUps(slice::Iter<'a, PowerUp>),
}

impl<'a> Iterator for AliveIter<'a> {
    type Item = EntityRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            AliveInner::Invaders(it) => it.find(|e| e.alive).map(EntityRef::Invader),
            AliveInner::Bullets(it, owner) => {
                let owner = *owner;
                it.find(|b| b.alive && b.owner == owner)
                    .map(EntityRef::Bullet)
            }
            AliveInner::Barriers(it) => it.find(|c| c.alive).map(EntityRef::BarrierCell),
            AliveInner::Saucer(slot) => slot.take().filter(|s| s.alive).map(EntityRef::Saucer),
            AliveInner::Heavy(slot) => slot.take().filter(|h| h.alive).map(EntityRef::Heavy),
            AliveInner::PowerUps(it) => it.find(|u| u.alive).map(EntityRef::PowerUp),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntityStore {
    next_id: u32,
    pub(crate) player: Player,
    pub(crate) invaders: Vec<Invader>,
    pub(crate) bullets: Vec<Bullet>,
    pub(crate) barriers: Vec<BarrierCell>,
    pub(crate) saucer: Option<Saucer>,
    pub(crate) heavy: Option<Heavy>,
    pub(crate) power_ups: Vec<PowerUp>,
    staged_bullets: Vec<Bullet>,
    staged_saucer: Option<Saucer>,
    staged_heavy: Option<Heavy>,
    staged_power_ups: Vec<PowerUp>,
    max_invader_bullets: usize,
    max_power_ups: usize,
}

impl EntityStore {
    /// Create a store holding only the player ship, centred at the bottom.
    pub fn new(config: &SimConfig) -> Self {
        let mut store = Self {
            next_id: 0,
            player: Player {
                rect: Rect::default(),
                lives: config.player.starting_lives,
                score: 0,
                fire_cooldown: 0,
                power: None,
                alive: true,
            },
            invaders: Vec::with_capacity(
                config.formation.max_rows.max(config.formation.rows) as usize
                    * config.formation.cols as usize,
            ),
            bullets: Vec::with_capacity(config.invader_fire.max_bullets as usize + 1),
            barriers: Vec::new(),
            saucer: None,
            heavy: None,
            power_ups: Vec::with_capacity(config.power_ups.max_falling as usize),
            staged_bullets: Vec::new(),
            staged_saucer: None,
            staged_heavy: None,
            staged_power_ups: Vec::new(),
            max_invader_bullets: config.invader_fire.max_bullets as usize,
            max_power_ups: config.power_ups.max_falling as usize,
        };
        store.reset_player_position(config);
        store
    }

    fn alloc_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn invaders(&self) -> &[Invader] {
        &self.invaders
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn barriers(&self) -> &[BarrierCell] {
        &self.barriers
    }

    pub fn saucer(&self) -> Option<&Saucer> {
        self.saucer.as_ref().filter(|s| s.alive)
    }

    pub fn heavy(&self) -> Option<&Heavy> {
        self.heavy.as_ref().filter(|h| h.alive)
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn alive_invader_count(&self) -> usize {
        self.invaders.iter().filter(|i| i.alive).count()
    }

    /// Alive bullets of `owner`, including ones staged this tick.
    pub fn outstanding_bullets(&self, owner: Owner) -> usize {
        self.bullets
            .iter()
            .chain(self.staged_bullets.iter())
            .filter(|b| b.alive && b.owner == owner)
            .count()
    }

    /// Alive entities of one kind, in ascending id order.
    pub fn iter_alive(&self, kind: EntityKind) -> AliveIter<'_> {
        let inner = match kind {
            EntityKind::Invader => AliveInner::Invaders(self.invaders.iter()),
            EntityKind::PlayerBullet => AliveInner::Bullets(self.bullets.iter(), Owner::Player),
            EntityKind::InvaderBullet => AliveInner::Bullets(self.bullets.iter(), Owner::Invader),
            EntityKind::BarrierCell => AliveInner::Barriers(self.barriers.iter()),
            EntityKind::Saucer => AliveInner::Saucer(self.saucer.as_ref()),
            EntityKind::Heavy => AliveInner::Heavy(self.heavy.as_ref()),
            EntityKind::PowerUp => AliveInner::PowerUps(self.power_ups.iter()),
        };
        AliveIter { inner }
    }

    pub fn reset_player_position(&mut self, config: &SimConfig) {
        let p = &config.player;
        self.player.rect = Rect::new(
            (config.playfield.width - p.width) / 2,
            config.player_y(),
            p.width,
            p.height,
        );
    }

    /// Replace the invader population with a fresh `rows` x `cols` grid.
    ///
    /// Ids ascend row-major from the top-left invader. The grid is centred
    /// horizontally.
    pub fn spawn_invader_grid(
        &mut self,
        config: &SimConfig,
        rows: u16,
        cols: u16,
        level: u32,
    ) -> Formation {
        let layout = &config.formation;
        let origin_x = (config.playfield.width - layout.width_for(cols)) / 2;

        self.invaders.clear();
        for row in 0..rows {
            for col in 0..cols {
                let id = self.alloc_id();
                self.invaders.push(Invader {
                    id,
                    rect: Rect::new(
                        origin_x + col as i32 * (layout.invader_width + layout.h_gap),
                        layout.top + row as i32 * (layout.invader_height + layout.v_gap),
                        layout.invader_width,
                        layout.invader_height,
                    ),
                    row,
                    col,
                    points: points_for_row(row),
                    alive: true,
                });
            }
        }

        let (base_step, max_step) = config.steps_for_level(level);
        Formation::new(rows as usize * cols as usize, cols, base_step, max_step)
    }

    /// Rebuild every barrier at full health.
    pub fn spawn_barriers(&mut self, config: &SimConfig) {
        self.barriers.clear();
        let b = &config.barriers;
        if b.count == 0 {
            return;
        }

        let spacing = config.playfield.width / b.count as i32;
        let barrier_w = b.cols as i32 * b.cell_width;
        let top = config.playfield.height - b.bottom_offset;

        for barrier in 0..b.count {
            let left = spacing * barrier as i32 + spacing / 2 - barrier_w / 2;
            for row in 0..b.rows {
                for col in 0..b.cols {
                    let id = self.alloc_id();
                    self.barriers.push(BarrierCell {
                        id,
                        rect: Rect::new(
                            left + col as i32 * b.cell_width,
                            top + row as i32 * b.cell_height,
                            b.cell_width,
                            b.cell_height,
                        ),
                        barrier,
                        health: b.cell_health,
                        alive: true,
                    });
                }
            }
        }
    }

    /// Stage a new bullet. It joins iteration at the next tick boundary.
    pub fn add_bullet(&mut self, owner: Owner, rect: Rect, vy: i32) -> Result<EntityId, SimError> {
        self.stage_bullet(owner, rect, vy, false)
    }

    /// Stage a player strong missile, subject to the same one-bullet rule.
    pub fn add_strong_bullet(&mut self, rect: Rect, vy: i32) -> Result<EntityId, SimError> {
        self.stage_bullet(Owner::Player, rect, vy, true)
    }

    fn stage_bullet(
        &mut self,
        owner: Owner,
        rect: Rect,
        vy: i32,
        strong: bool,
    ) -> Result<EntityId, SimError> {
        let outstanding = self.outstanding_bullets(owner);
        match owner {
            Owner::Player if outstanding >= 1 => {
                return Err(SimError::CapacityExceeded {
                    pool: BulletPool::Player,
                })
            }
            Owner::Invader if outstanding >= self.max_invader_bullets => {
                return Err(SimError::CapacityExceeded {
                    pool: BulletPool::Invader,
                })
            }
            _ => {}
        }

        let id = self.alloc_id();
        self.staged_bullets.push(Bullet {
            id,
            owner,
            rect,
            vy,
            strong,
            alive: true,
        });
        Ok(id)
    }

    /// Stage a saucer unless one is already flying or staged.
    pub fn spawn_saucer(
        &mut self,
        rect: Rect,
        direction: HorizontalDirection,
        points: u32,
    ) -> Option<EntityId> {
        if self.saucer().is_some() || self.staged_saucer.is_some() {
            return None;
        }
        let id = self.alloc_id();
        self.staged_saucer = Some(Saucer {
            id,
            rect,
            direction,
            points,
            alive: true,
        });
        Some(id)
    }

    /// Stage a heavy invader unless one is already crossing or staged.
    pub fn spawn_heavy(
        &mut self,
        rect: Rect,
        direction: HorizontalDirection,
        health: u8,
        points: u32,
    ) -> Option<EntityId> {
        if self.heavy().is_some() || self.staged_heavy.is_some() {
            return None;
        }
        let id = self.alloc_id();
        self.staged_heavy = Some(Heavy {
            id,
            rect,
            direction,
            health,
            max_health: health,
            points,
            fire_timer: 0,
            alive: true,
        });
        Some(id)
    }

    /// Stage a falling pickup. `None` when `max_falling` are already out.
    pub fn add_power_up(&mut self, kind: PowerUpKind, rect: Rect) -> Option<EntityId> {
        let falling = self
            .power_ups
            .iter()
            .chain(self.staged_power_ups.iter())
            .filter(|u| u.alive)
            .count();
        if falling >= self.max_power_ups {
            return None;
        }
        let id = self.alloc_id();
        self.staged_power_ups.push(PowerUp {
            id,
            rect,
            kind,
            alive: true,
        });
        Some(id)
    }

    /// Drop bullets immediately, staged ones included. `None` clears both sides.
    pub fn clear_bullets(&mut self, owner: Option<Owner>) {
        let keep = |b: &Bullet| owner.is_some_and(|o| b.owner != o);
        self.bullets.retain(keep);
        self.staged_bullets.retain(keep);
    }

    pub fn clear_saucer(&mut self) {
        self.saucer = None;
        self.staged_saucer = None;
    }

    pub fn clear_heavy(&mut self) {
        self.heavy = None;
        self.staged_heavy = None;
    }

    pub fn clear_power_ups(&mut self) {
        self.power_ups.clear();
        self.staged_power_ups.clear();
    }

    /// Tick boundary: purge every dead entity, then commit staged spawns.
    ///
    /// Returns the number of entities purged.
    pub fn remove_dead(&mut self) -> usize {
        let population = |s: &Self| {
            s.invaders.len() + s.bullets.len() + s.barriers.len() + s.power_ups.len()
        };
        let before = population(self);
        self.invaders.retain(|i| i.alive);
        self.bullets.retain(|b| b.alive);
        self.barriers.retain(|c| c.alive);
        self.power_ups.retain(|u| u.alive);
        let mut purged = before - population(self);

        if self.saucer.as_ref().is_some_and(|s| !s.alive) {
            self.saucer = None;
            purged += 1;
        }
        if self.heavy.as_ref().is_some_and(|h| !h.alive) {
            self.heavy = None;
            purged += 1;
        }

        self.bullets
            .extend(self.staged_bullets.drain(..).filter(|b| b.alive));
        self.power_ups
            .extend(self.staged_power_ups.drain(..).filter(|u| u.alive));
        if self.saucer.is_none() {
            self.saucer = self.staged_saucer.take();
        }
        if self.heavy.is_none() {
            self.heavy = self.staged_heavy.take();
        }

        purged
    }
}
