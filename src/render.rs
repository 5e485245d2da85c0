use std::collections::HashSet;

use crate::types::{Cell, ObstacleSnapshot, Snapshot, Variant};

const PLAYER: &str = "🟡";
const WALL: &str = "🟥";
const PELLET: &str = "🦾";
const CHASER: &str = "👻";
const FRIGHTENED: &str = "💀";
const WANDERER: &str = "👾";
const EMPTY: &str = "⬛";
const BIRD: &str = "🐦";
const PIPE: &str = "🔲";
const SKY: &str = "  ";

fn dot_glyph(variant: Variant) -> &'static str {
    match variant {
        Variant::Classic => "🍩",
        Variant::Wander => "•",
    }
}

/// One string per grid row, cells separated by a space.
pub fn render_board(snapshot: &Snapshot) -> Vec<String> {
    let walls: HashSet<Cell> = snapshot.walls.iter().copied().collect();
    let dots: HashSet<Cell> = snapshot.dots.iter().copied().collect();
    let pellets: HashSet<Cell> = snapshot.pellets.iter().copied().collect();
    let pursuers: HashSet<Cell> = snapshot.pursuers.iter().map(|p| p.cell).collect();
    let pursuer_glyph = match snapshot.variant {
        Variant::Classic if snapshot.vulnerable => FRIGHTENED,
        Variant::Classic => CHASER,
        Variant::Wander => WANDERER,
    };

    (0..snapshot.grid_size)
        .map(|row| {
            (0..snapshot.grid_size)
                .map(|col| {
                    let cell = Cell::new(row, col);
                    if cell == snapshot.player {
                        PLAYER
                    } else if pursuers.contains(&cell) {
                        pursuer_glyph
                    } else if walls.contains(&cell) {
                        WALL
                    } else if pellets.contains(&cell) {
                        PELLET
                    } else if dots.contains(&cell) {
                        dot_glyph(snapshot.variant)
                    } else {
                        EMPTY
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

pub fn status_line(snapshot: &Snapshot) -> String {
    let mut line = format!("Score: {} | Lives: {}", snapshot.score, snapshot.lives);
    if snapshot.vulnerable {
        line.push_str(&format!(" | Vulnerable: {}", snapshot.vulnerable_timer));
    }
    if snapshot.won {
        line.push_str(" | You win!");
    } else if snapshot.game_over {
        line.push_str(" | Game over");
    } else if snapshot.life_lost {
        line.push_str(" | Life lost!");
    }
    line
}

/// Top row first. The visible strip is just wide enough to watch the pipe approach.
pub fn render_obstacle(snapshot: &ObstacleSnapshot) -> Vec<String> {
    let width = snapshot.height / 2 + snapshot.pipe_width + 1;
    let gap = snapshot.pipe_gap_start..snapshot.pipe_gap_start + snapshot.pipe_gap_height;
    let pipe_cols = snapshot.pipe_column..snapshot.pipe_column + snapshot.pipe_width;

    (0..snapshot.height)
        .rev()
        .map(|y| {
            (0..width)
                .map(|x| {
                    if x == 0 && y == snapshot.bird_row {
                        BIRD
                    } else if pipe_cols.contains(&x) && !gap.contains(&y) {
                        PIPE
                    } else {
                        SKY
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GridChaseEngine;
    use crate::obstacle::ObstacleEngine;
    use crate::types::GameConfig;

    #[test]
    fn board_has_one_row_per_grid_row_and_marks_actors() {
        let engine = GridChaseEngine::new(GameConfig::classic(), 9).expect("valid preset");
        let snapshot = engine.snapshot();
        let rows = render_board(&snapshot);
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|row| row.split(' ').count() == 12));
        assert_eq!(rows[1].split(' ').nth(1), Some(PLAYER));
        assert!(rows[0].contains(WALL));
        assert_eq!(rows.concat().matches(CHASER).count(), 4);
        assert_eq!(rows.concat().matches(PELLET).count(), 3);
    }

    #[test]
    fn vulnerable_pursuers_change_glyph() {
        let engine = GridChaseEngine::new(GameConfig::classic(), 9).expect("valid preset");
        let mut snapshot = engine.snapshot();
        snapshot.vulnerable = true;
        let board = render_board(&snapshot).concat();
        assert!(board.contains(FRIGHTENED));
        assert!(!board.contains(CHASER));
    }

    #[test]
    fn status_line_reports_outcome() {
        let engine = GridChaseEngine::new(GameConfig::wander(), 9).expect("valid preset");
        let mut snapshot = engine.snapshot();
        assert_eq!(status_line(&snapshot), "Score: 0 | Lives: 3");
        snapshot.game_over = true;
        assert!(status_line(&snapshot).ends_with("Game over"));
    }

    #[test]
    fn obstacle_board_shows_bird_in_first_column() {
        let engine = ObstacleEngine::new(1);
        let snapshot = engine.snapshot();
        let rows = render_obstacle(&snapshot);
        assert_eq!(rows.len(), snapshot.height as usize);
        let bird_line = (snapshot.height - 1 - snapshot.bird_row) as usize;
        assert!(rows[bird_line].starts_with(BIRD));
    }
}
