//! Formation controller - lockstep invader movement
//!
//! Every live invader moves by `direction * step_size` each tick. When the
//! leading edge would cross a side wall the formation instead drops by the
//! configured descent and reverses; it never moves horizontally and vertically
//! in the same tick.
//!
//! The step size grows with the share of invaders destroyed in the current
//! level and never shrinks until a new formation is spawned.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::config::SimConfig;
use crate::rng::SimRng;
use crate::store::{EntityId, EntityStore};
use crate::types::HorizontalDirection;

/// Upper bound on formation columns (bounded fire-selection buffers).
pub const MAX_FORMATION_COLS: usize = 32;

/// What one call to [`Formation::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormationDelta {
    pub dx: i32,
    pub dy: i32,
    /// The formation hit a wall at least once.
    pub reversed: bool,
    /// A live invader reached the invasion line.
    pub invaded: bool,
}

/// Bottom-most live invader of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shooter {
    pub col: u16,
    pub id: EntityId,
    pub x: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Formation {
    direction: HorizontalDirection,
    step_size: i32,
    base_step: i32,
    max_step: i32,
    total_spawned: usize,
    cols: u16,
    descend: bool,
    anim_frame: u8,
    anim_counter: u32,
}

impl Formation {
    pub fn new(total_spawned: usize, cols: u16, base_step: i32, max_step: i32) -> Self {
        Self {
            direction: HorizontalDirection::Right,
            step_size: base_step,
            base_step,
            max_step: max_step.max(base_step),
            total_spawned,
            cols,
            descend: false,
            anim_frame: 0,
            anim_counter: 0,
        }
    }

    pub fn direction(&self) -> HorizontalDirection {
        self.direction
    }

    pub fn step_size(&self) -> i32 {
        self.step_size
    }

    pub fn total_spawned(&self) -> usize {
        self.total_spawned
    }

    /// True when the most recent tick was a wall-hit descent.
    pub fn descend(&self) -> bool {
        self.descend
    }

    pub fn anim_frame(&self) -> u8 {
        self.anim_frame
    }

    /// Step size for a population of `alive` invaders.
    pub fn step_for(&self, alive: usize) -> i32 {
        if self.total_spawned == 0 {
            return self.max_step;
        }
        let destroyed = self.total_spawned.saturating_sub(alive) as i64;
        let span = (self.max_step - self.base_step) as i64;
        self.base_step + (span * destroyed / self.total_spawned as i64) as i32
    }

    /// Recompute the step size after invaders were destroyed. Never slows down.
    pub fn on_population_changed(&mut self, alive: usize) {
        self.step_size = self.step_size.max(self.step_for(alive));
    }

    /// Move the formation by `ticks` lockstep steps.
    pub fn advance(&mut self, store: &mut EntityStore, config: &SimConfig, ticks: u32) -> FormationDelta {
        let mut delta = FormationDelta::default();
        let invasion_line = config.invasion_line();

        for _ in 0..ticks {
            self.descend = false;
            self.tick_animation(config.formation.anim_period_ticks);

            let Some((left, right)) = alive_extent(store) else {
                break;
            };

            let step = self.step_size;
            let crosses = match self.direction {
                HorizontalDirection::Right => right + step > config.playfield.width,
                HorizontalDirection::Left => left - step < 0,
            };

            if crosses {
                let descent = config.formation.descent;
                for inv in store.invaders.iter_mut().filter(|i| i.alive) {
                    inv.rect.translate(0, descent);
                }
                self.direction = self.direction.reversed();
                self.descend = true;
                delta.dy += descent;
                delta.reversed = true;
            } else {
                let dx = self.direction.sign() * step;
                for inv in store.invaders.iter_mut().filter(|i| i.alive) {
                    inv.rect.translate(dx, 0);
                }
                delta.dx += dx;
            }

            if store
                .invaders
                .iter()
                .any(|i| i.alive && i.rect.bottom() >= invasion_line)
            {
                delta.invaded = true;
                break;
            }
        }

        delta
    }

    fn tick_animation(&mut self, period: u32) {
        self.anim_counter += 1;
        if self.anim_counter >= period.max(1) {
            self.anim_counter = 0;
            self.anim_frame ^= 1;
        }
    }

    /// Bottom-most live invader of every column, ascending by column.
    pub fn shooters(&self, store: &EntityStore) -> ArrayVec<Shooter, MAX_FORMATION_COLS> {
        let mut by_col: [Option<Shooter>; MAX_FORMATION_COLS] = [None; MAX_FORMATION_COLS];
        for inv in store.invaders.iter().filter(|i| i.alive) {
            let Some(slot) = by_col.get_mut(inv.col as usize) else {
                continue;
            };
            let lower = slot.map_or(true, |s| inv.rect.bottom() > s.bottom);
            if lower {
                *slot = Some(Shooter {
                    col: inv.col,
                    id: inv.id,
                    x: inv.rect.center_x(),
                    bottom: inv.rect.bottom(),
                });
            }
        }
        by_col
            .iter()
            .take((self.cols as usize).min(MAX_FORMATION_COLS))
            .flatten()
            .copied()
            .collect()
    }

    /// Shooters for one volley, in ascending column order.
    ///
    /// Callers spawn bullets in the returned order, so when the bullet cap is
    /// reached the lowest columns win.
    pub fn select_volley(
        &self,
        store: &EntityStore,
        rng: &mut SimRng,
        volley_size: usize,
    ) -> ArrayVec<Shooter, MAX_FORMATION_COLS> {
        let shooters = self.shooters(store);
        let picks: ArrayVec<usize, MAX_FORMATION_COLS> =
            rng.sample_indices(shooters.len(), volley_size);
        picks.iter().map(|&i| shooters[i]).collect()
    }
}

/// `(min left, max right)` over alive invaders.
fn alive_extent(store: &EntityStore) -> Option<(i32, i32)> {
    store
        .invaders
        .iter()
        .filter(|i| i.alive)
        .fold(None, |acc, i| match acc {
            None => Some((i.rect.left(), i.rect.right())),
            Some((l, r)) => Some((l.min(i.rect.left()), r.max(i.rect.right()))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(rows: u16, cols: u16) -> (SimConfig, EntityStore, Formation) {
        let cfg = SimConfig::default();
        let mut store = EntityStore::new(&cfg);
        let formation = store.spawn_invader_grid(&cfg, rows, cols, 1);
        (cfg, store, formation)
    }

    fn rightmost(store: &EntityStore) -> i32 {
        alive_extent(store).map(|(_, r)| r).unwrap()
    }

    #[test]
    fn moves_right_by_step_each_tick() {
        let (cfg, mut store, mut formation) = setup(2, 3);
        let x0 = store.invaders()[0].rect.x;

        let delta = formation.advance(&mut store, &cfg, 3);
        assert_eq!(delta.dx, 3 * cfg.formation.base_step);
        assert_eq!(delta.dy, 0);
        assert_eq!(store.invaders()[0].rect.x, x0 + 3 * cfg.formation.base_step);
    }

    #[test]
    fn exactly_at_wall_descends_and_reverses_without_horizontal_move() {
        let (cfg, mut store, mut formation) = setup(2, 3);
        let shift = cfg.playfield.width - rightmost(&store);
        for inv in store.invaders.iter_mut() {
            inv.rect.translate(shift, 0);
        }
        assert_eq!(rightmost(&store), cfg.playfield.width);
        let before: Vec<_> = store.invaders().iter().map(|i| i.rect).collect();

        let delta = formation.advance(&mut store, &cfg, 1);

        assert!(delta.reversed);
        assert!(formation.descend());
        assert_eq!(delta.dx, 0);
        assert_eq!(delta.dy, cfg.formation.descent);
        assert_eq!(formation.direction(), HorizontalDirection::Left);
        for (old, inv) in before.iter().zip(store.invaders()) {
            assert_eq!(inv.rect.x, old.x);
            assert_eq!(inv.rect.y, old.y + cfg.formation.descent);
        }

        // Next tick moves left and clears the descend flag.
        let delta = formation.advance(&mut store, &cfg, 1);
        assert_eq!(delta.dx, -cfg.formation.base_step);
        assert!(!formation.descend());
    }

    #[test]
    fn left_wall_reverses_to_the_right() {
        let (cfg, mut store, mut formation) = setup(1, 2);
        formation.direction = HorizontalDirection::Left;
        let left = alive_extent(&store).unwrap().0;
        for inv in store.invaders.iter_mut() {
            inv.rect.translate(-left, 0);
        }

        let delta = formation.advance(&mut store, &cfg, 1);
        assert!(delta.reversed);
        assert_eq!(formation.direction(), HorizontalDirection::Right);
        assert_eq!(alive_extent(&store).unwrap().0, 0);
    }

    #[test]
    fn dead_invaders_do_not_count_for_the_wall() {
        let (cfg, mut store, mut formation) = setup(1, 3);
        let shift = cfg.playfield.width - rightmost(&store);
        for inv in store.invaders.iter_mut() {
            inv.rect.translate(shift, 0);
        }
        // Kill the rightmost column; the survivors have room to move.
        store.invaders[2].alive = false;

        let delta = formation.advance(&mut store, &cfg, 1);
        assert!(!delta.reversed);
        assert_eq!(delta.dx, cfg.formation.base_step);
    }

    #[test]
    fn step_size_grows_monotonically_with_destruction() {
        let (cfg, _store, mut formation) = setup(5, 10);
        let mut last = formation.step_size();
        assert_eq!(last, cfg.formation.base_step);

        for alive in (0..50).rev() {
            formation.on_population_changed(alive);
            assert!(formation.step_size() >= last);
            last = formation.step_size();
        }
        assert_eq!(last, cfg.formation.max_step);
    }

    #[test]
    fn step_size_never_drops_on_population_report_increase() {
        let (_, _store, mut formation) = setup(5, 10);
        formation.on_population_changed(5);
        let fast = formation.step_size();
        formation.on_population_changed(50);
        assert_eq!(formation.step_size(), fast);
    }

    #[test]
    fn reaching_invasion_line_is_reported() {
        let (cfg, mut store, mut formation) = setup(1, 1);
        let gap = cfg.invasion_line() - store.invaders()[0].rect.bottom();
        store.invaders[0].rect.translate(0, gap - 1);

        let delta = formation.advance(&mut store, &cfg, 1);
        assert!(!delta.invaded);

        store.invaders[0].rect.translate(0, 1);
        let delta = formation.advance(&mut store, &cfg, 1);
        assert!(delta.invaded);
    }

    #[test]
    fn shooters_are_bottom_most_per_column() {
        let (_, mut store, formation) = setup(3, 4);
        // Column 1 loses its bottom invader; column 3 is wiped out.
        let kill = |store: &mut EntityStore, row: u16, col: u16| {
            for inv in store.invaders.iter_mut() {
                if inv.row == row && inv.col == col {
                    inv.alive = false;
                }
            }
        };
        kill(&mut store, 2, 1);
        for row in 0..3 {
            kill(&mut store, row, 3);
        }

        let shooters = formation.shooters(&store);
        let cols: Vec<u16> = shooters.iter().map(|s| s.col).collect();
        assert_eq!(cols, vec![0, 1, 2]);

        let rows: Vec<u16> = shooters
            .iter()
            .map(|s| store.invaders().iter().find(|i| i.id == s.id).unwrap().row)
            .collect();
        assert_eq!(rows, vec![2, 1, 2]);
    }

    #[test]
    fn volley_is_ascending_by_column() {
        let (_, store, formation) = setup(2, 8);
        let mut rng = SimRng::new(77);
        for _ in 0..50 {
            let volley = formation.select_volley(&store, &mut rng, 3);
            assert_eq!(volley.len(), 3);
            assert!(volley.windows(2).all(|w| w[0].col < w[1].col));
        }
    }

    #[test]
    fn animation_frame_toggles_on_period() {
        let (cfg, mut store, mut formation) = setup(1, 1);
        let period = cfg.formation.anim_period_ticks;
        assert_eq!(formation.anim_frame(), 0);
        formation.advance(&mut store, &cfg, period);
        assert_eq!(formation.anim_frame(), 1);
    }
}
