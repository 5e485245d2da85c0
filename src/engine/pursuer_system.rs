use super::*;

impl GridChaseEngine {
    /// One greedy step for every pursuer toward the player's current cell.
    pub(super) fn chase_step(&mut self) {
        let target = self.player;
        for idx in 0..self.pursuers.len() {
            if let Some(next) = greedy_step(&self.grid, self.pursuers[idx].cell, target) {
                self.pursuers[idx].cell = next;
            }
        }
        debug!(
            "chase pass {}: {:?}",
            self.move_count,
            self.pursuers.iter().map(|p| p.cell).collect::<Vec<_>>()
        );
    }

    /// Moves pursuers in order. A cell is unavailable if an earlier pursuer moved into it
    /// this tick or a later pursuer still stands on it, so no two pursuers ever share a cell.
    pub(super) fn wander_step(&mut self) {
        let mut claimed: HashSet<Cell> = self.pursuers.iter().map(|p| p.cell).collect();
        for idx in 0..self.pursuers.len() {
            let from = self.pursuers[idx].cell;
            claimed.remove(&from);
            let next = wander_target(&self.grid, &mut self.rng, from, &claimed).unwrap_or(from);
            claimed.insert(next);
            self.pursuers[idx].cell = next;
        }
    }
}

/// Neighbour (up, down, left, right) closest to `target` by Manhattan distance. Ties keep
/// the earliest direction. `None` when every neighbour is blocked.
pub(super) fn greedy_step(grid: &Grid, from: Cell, target: Cell) -> Option<Cell> {
    let mut best: Option<(Cell, i32)> = None;
    for dir in Direction::ALL {
        let candidate = step(from, dir);
        if !grid.is_walkable(candidate) {
            continue;
        }
        let dist = candidate.manhattan(target);
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((candidate, dist));
        }
    }
    best.map(|(cell, _)| cell)
}

pub(super) fn wander_target(
    grid: &Grid,
    rng: &mut Rng,
    from: Cell,
    claimed: &HashSet<Cell>,
) -> Option<Cell> {
    let mut offsets = WANDER_OFFSETS;
    rng.shuffle(&mut offsets);
    offsets
        .iter()
        .map(|(dr, dc)| from.offset(*dr, *dc))
        .find(|cell| grid.is_walkable(*cell) && !claimed.contains(cell))
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};

    use super::{greedy_step, wander_target};
    use crate::grid::Grid;
    use crate::rng::Rng;
    use crate::types::Cell;

    fn open_grid(size: i32) -> Grid {
        Grid {
            size,
            walls: BTreeSet::new(),
        }
    }

    #[test]
    fn greedy_prefers_up_over_left_on_ties() {
        let grid = open_grid(8);
        let next = greedy_step(&grid, Cell::new(5, 5), Cell::new(3, 3));
        assert_eq!(next, Some(Cell::new(4, 5)));
    }

    #[test]
    fn greedy_falls_back_to_left_when_up_is_walled() {
        let mut grid = open_grid(8);
        grid.walls.insert(Cell::new(4, 5));
        let next = greedy_step(&grid, Cell::new(5, 5), Cell::new(3, 3));
        assert_eq!(next, Some(Cell::new(5, 4)));
    }

    #[test]
    fn greedy_moves_even_when_every_option_is_worse() {
        let mut grid = open_grid(3);
        grid.walls.insert(Cell::new(0, 1));
        let next = greedy_step(&grid, Cell::new(0, 0), Cell::new(0, 2));
        assert_eq!(next, Some(Cell::new(1, 0)));
    }

    #[test]
    fn greedy_stays_when_boxed_in() {
        let mut grid = open_grid(3);
        grid.walls.insert(Cell::new(0, 1));
        grid.walls.insert(Cell::new(1, 0));
        assert_eq!(greedy_step(&grid, Cell::new(0, 0), Cell::new(2, 2)), None);
    }

    #[test]
    fn wander_only_lands_on_legal_unclaimed_cells() {
        let mut grid = open_grid(5);
        grid.walls.insert(Cell::new(2, 3));
        let claimed: HashSet<Cell> = [Cell::new(2, 1)].into_iter().collect();
        let from = Cell::new(2, 2);
        for seed in 1..300u32 {
            let mut rng = Rng::new(seed);
            let next = wander_target(&grid, &mut rng, from, &claimed).expect("open board");
            assert!(grid.is_walkable(next));
            assert!(!claimed.contains(&next));
            assert_ne!(next, from);
            let dr = (next.row - from.row).abs();
            let dc = (next.col - from.col).abs();
            assert!(dr <= 2 && dc <= 2);
            assert!(dr == 0 || dc == 0 || dr == dc);
        }
    }

    #[test]
    fn wander_returns_none_when_everything_is_taken() {
        let grid = open_grid(1);
        let mut rng = Rng::new(5);
        assert_eq!(
            wander_target(&grid, &mut rng, Cell::new(0, 0), &HashSet::new()),
            None
        );
    }
}
