//! Snapshot-driven bot used by the simulator to play sessions without a human.

use crate::rng::Rng;
use crate::types::{Cell, Direction, Snapshot};

const DANGER_PENALTY: i32 = 1_000;

/// Picks a legal direction that heads for the nearest collectible while steering clear of
/// pursuers that are not vulnerable. Ties are broken at random.
pub fn choose_direction(snapshot: &Snapshot, rng: &mut Rng) -> Direction {
    let targets: Vec<Cell> = snapshot
        .dots
        .iter()
        .chain(snapshot.pellets.iter())
        .copied()
        .collect();

    let mut best: Vec<Direction> = Vec::new();
    let mut best_score = i32::MAX;
    for dir in Direction::ALL {
        let (dr, dc) = dir.delta();
        let next = snapshot.player.offset(dr, dc);
        if !snapshot.is_walkable(next) {
            continue;
        }

        let mut score = targets
            .iter()
            .map(|target| next.manhattan(*target))
            .min()
            .unwrap_or(0);
        if !snapshot.vulnerable
            && snapshot
                .pursuers
                .iter()
                .any(|pursuer| next.manhattan(pursuer.cell) <= 1)
        {
            score += DANGER_PENALTY;
        }

        if score < best_score {
            best_score = score;
            best.clear();
            best.push(dir);
        } else if score == best_score {
            best.push(dir);
        }
    }

    if best.is_empty() {
        return Direction::ALL[rng.pick_index(Direction::ALL.len())];
    }
    best[rng.pick_index(best.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GridChaseEngine;
    use crate::types::{GameConfig, Variant};

    fn open_snapshot() -> Snapshot {
        let config = GameConfig {
            variant: Variant::Classic,
            grid_size: 8,
            walls: vec![Cell::new(0, 1)],
            spawn: Cell::new(1, 1),
            pursuer_starts: vec![Cell::new(7, 7)],
            num_dots: 0,
            num_pellets: 0,
            max_lives: 3,
        };
        GridChaseEngine::new(config, 1)
            .expect("valid config")
            .snapshot()
    }

    #[test]
    fn heads_for_the_nearest_dot() {
        let mut snapshot = open_snapshot();
        snapshot.dots = vec![Cell::new(1, 4)];
        let mut rng = Rng::new(3);
        for _ in 0..20 {
            assert_eq!(choose_direction(&snapshot, &mut rng), Direction::Right);
        }
    }

    #[test]
    fn avoids_cells_next_to_a_pursuer() {
        let mut snapshot = open_snapshot();
        snapshot.dots = vec![Cell::new(1, 5)];
        snapshot.pursuers[0].cell = Cell::new(1, 3);
        let mut rng = Rng::new(5);
        for _ in 0..20 {
            let dir = choose_direction(&snapshot, &mut rng);
            assert_ne!(dir, Direction::Right);
            assert_ne!(dir, Direction::Up);
        }
    }

    #[test]
    fn never_picks_a_wall_or_the_edge() {
        let mut snapshot = open_snapshot();
        snapshot.player = Cell::new(0, 0);
        let mut rng = Rng::new(8);
        for _ in 0..50 {
            assert_eq!(choose_direction(&snapshot, &mut rng), Direction::Down);
        }
    }
}
