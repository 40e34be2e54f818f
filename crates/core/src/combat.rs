//! Collision and combat resolution
//!
//! [`resolve`] runs once per tick after all movement and before
//! [`EntityStore::remove_dead`]. Rules are applied in a fixed order:
//!
//! | # | Test | Effect |
//! |---|------|--------|
//! | 1 | player bullet vs invaders, then saucer, then heavy invader | target damaged or destroyed, bullet destroyed unless strong, score |
//! | 2 | player bullet vs barrier cells | cell damaged, bullet destroyed |
//! | 3 | invader bullets vs barrier cells | cell damaged, bullet destroyed |
//! | 4 | invader bullets vs player | bullet destroyed, shield spent or one life lost |
//! | 5 | bullets and pickups not fully inside the playfield | destroyed |
//! | 6 | pickups vs player | pickup destroyed, power-up activated |
//!
//! A bullet destroyed by an earlier rule is skipped by every later one, and a
//! bullet affects at most one target per pass.

use crate::config::SimConfig;
use crate::geometry::{contains, intersects, Rect};
use crate::store::{ActivePower, BarrierCell, EntityId, EntityStore};
use crate::types::{Owner, PowerUpKind};

/// Outcome of one [`resolve`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Every entity destroyed this pass, in the order it died.
    pub destroyed: Vec<EntityId>,
    pub score_delta: u32,
    pub player_hit: bool,
    pub lives_lost: u32,
    pub invaders_destroyed: u32,
    pub saucer_destroyed: bool,
    /// Hits landed on the heavy invader, the destroying one included.
    pub heavy_hits: u32,
    pub heavy_destroyed: bool,
    /// Where enemies died; candidate spots for a power-up drop.
    pub drop_sites: Vec<Rect>,
    pub shield_absorbed: bool,
    pub power_up_collected: Option<PowerUpKind>,
}

impl ResolutionReport {
    fn award(&mut self, points: u32) {
        self.score_delta = self.score_delta.saturating_add(points);
    }
}

/// Apply rules 1-6 to the store. `level` selects the score multiplier.
pub fn resolve(store: &mut EntityStore, config: &SimConfig, level: u32) -> ResolutionReport {
    let mut report = ResolutionReport::default();
    let EntityStore {
        player,
        invaders,
        bullets,
        barriers,
        saucer,
        heavy,
        power_ups,
        ..
    } = store;

    // 1. Player bullet vs invaders (ascending id), then the saucer, then the heavy.
    for bullet in bullets
        .iter_mut()
        .filter(|b| b.alive && b.owner == Owner::Player)
    {
        if let Some(inv) = invaders
            .iter_mut()
            .find(|i| i.alive && intersects(&bullet.rect, &i.rect))
        {
            inv.alive = false;
            report.award(config.scale_points(inv.points, level));
            report.invaders_destroyed += 1;
            report.drop_sites.push(inv.rect);
            report.destroyed.push(inv.id);
            if !bullet.strong {
                bullet.alive = false;
                report.destroyed.push(bullet.id);
            }
            continue;
        }

        if let Some(s) = saucer
            .as_mut()
            .filter(|s| s.alive && intersects(&bullet.rect, &s.rect))
        {
            s.alive = false;
            report.award(config.scale_points(s.points, level));
            report.saucer_destroyed = true;
            report.drop_sites.push(s.rect);
            report.destroyed.push(s.id);
            if !bullet.strong {
                bullet.alive = false;
                report.destroyed.push(bullet.id);
            }
            continue;
        }

        if let Some(h) = heavy
            .as_mut()
            .filter(|h| h.alive && intersects(&bullet.rect, &h.rect))
        {
            let damage = if bullet.strong {
                config.power_ups.strong_damage
            } else {
                1
            };
            h.health = h.health.saturating_sub(damage);
            report.heavy_hits += 1;
            report.award(config.scale_points(config.heavy.hit_points, level));
            if h.health == 0 {
                h.alive = false;
                report.award(config.scale_points(h.points, level));
                report.heavy_destroyed = true;
                report.drop_sites.push(h.rect);
                report.destroyed.push(h.id);
            }
            if !bullet.strong {
                bullet.alive = false;
                report.destroyed.push(bullet.id);
            }
        }
    }

    // 2 and 3. Bullets of either side vs barrier cells.
    for owner in [Owner::Player, Owner::Invader] {
        for bullet in bullets.iter_mut().filter(|b| b.alive && b.owner == owner) {
            if let Some(cell) = barriers
                .iter_mut()
                .find(|c| c.alive && intersects(&bullet.rect, &c.rect))
            {
                bullet.alive = false;
                report.destroyed.push(bullet.id);
                if damage(cell) {
                    report.destroyed.push(cell.id);
                }
            }
        }
    }

    // 4. Invader bullets vs player. Once the player is down the rest are no-ops.
    for bullet in bullets
        .iter_mut()
        .filter(|b| b.alive && b.owner == Owner::Invader)
    {
        if !player.alive {
            break;
        }
        if !intersects(&bullet.rect, &player.rect) {
            continue;
        }
        bullet.alive = false;
        report.destroyed.push(bullet.id);
        if player.has_power(PowerUpKind::Shield) {
            player.power = None;
            report.shield_absorbed = true;
            continue;
        }
        player.lives = player.lives.saturating_sub(1);
        report.lives_lost += 1;
        report.player_hit = true;
        if player.lives == 0 {
            player.alive = false;
        }
    }

    // 5. Out of bounds.
    let field = config.playfield.rect();
    for bullet in bullets
        .iter_mut()
        .filter(|b| b.alive && !contains(&field, &b.rect))
    {
        bullet.alive = false;
        report.destroyed.push(bullet.id);
    }
    for pickup in power_ups
        .iter_mut()
        .filter(|u| u.alive && !contains(&field, &u.rect))
    {
        pickup.alive = false;
        report.destroyed.push(pickup.id);
    }

    // 6. Pickups vs player.
    if player.alive {
        for pickup in power_ups
            .iter_mut()
            .filter(|u| u.alive && intersects(&u.rect, &player.rect))
        {
            pickup.alive = false;
            report.destroyed.push(pickup.id);
            player.power = Some(ActivePower {
                kind: pickup.kind,
                ticks_left: config.power_ups.duration_ticks,
            });
            report.power_up_collected = Some(pickup.kind);
        }
    }

    player.score = player.score.saturating_add(report.score_delta);
    report
}

/// Invaders crush any barrier cell they overlap. Returns the cells destroyed.
pub fn erode_barriers(store: &mut EntityStore) -> usize {
    let EntityStore {
        invaders, barriers, ..
    } = store;

    let mut eroded = 0;
    for inv in invaders.iter().filter(|i| i.alive) {
        for cell in barriers
            .iter_mut()
            .filter(|c| c.alive && intersects(&inv.rect, &c.rect))
        {
            cell.health = 0;
            cell.alive = false;
            eroded += 1;
        }
    }
    eroded
}

/// One hit on a cell. Returns true when the cell is destroyed.
fn damage(cell: &mut BarrierCell) -> bool {
    cell.health = cell.health.saturating_sub(1);
    if cell.health == 0 {
        cell.alive = false;
    }
    !cell.alive
}
