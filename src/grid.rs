use std::collections::{BTreeSet, HashSet};

use crate::error::ConfigError;
use crate::types::{Cell, GameConfig, Variant};

/// Square board with a fixed wall set. Immutable for the lifetime of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub size: i32,
    pub walls: BTreeSet<Cell>,
}

impl Grid {
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.in_bounds(self.size)
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        self.walls.contains(&cell)
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.is_wall(cell)
    }

    /// Walkable cells in row-major order, minus `excluded`.
    pub fn free_cells(&self, excluded: &HashSet<Cell>) -> Vec<Cell> {
        let mut cells = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let cell = Cell::new(row, col);
                if !self.is_wall(cell) && !excluded.contains(&cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }
}

/// Validates `config` and returns its board. Collectible counts are checked here too so a
/// bad config fails before any state is built.
pub fn build_grid(config: &GameConfig) -> Result<Grid, ConfigError> {
    if config.grid_size <= 0 {
        return Err(ConfigError::EmptyGrid {
            size: config.grid_size,
        });
    }
    if config.max_lives <= 0 {
        return Err(ConfigError::InvalidLives {
            lives: config.max_lives,
        });
    }
    if config.pursuer_starts.is_empty() {
        return Err(ConfigError::NoPursuers);
    }
    if config.variant == Variant::Wander && config.num_pellets > 0 {
        return Err(ConfigError::PelletsUnsupported {
            requested: config.num_pellets,
        });
    }

    let size = config.grid_size;
    let mut grid = Grid {
        size,
        walls: BTreeSet::new(),
    };
    for wall in &config.walls {
        if !grid.in_bounds(*wall) {
            return Err(ConfigError::OutOfBounds {
                what: "wall",
                cell: *wall,
                size,
            });
        }
        grid.walls.insert(*wall);
    }

    if !grid.in_bounds(config.spawn) {
        return Err(ConfigError::OutOfBounds {
            what: "spawn",
            cell: config.spawn,
            size,
        });
    }
    if grid.is_wall(config.spawn) {
        return Err(ConfigError::SpawnBlocked { cell: config.spawn });
    }

    for (index, start) in config.pursuer_starts.iter().enumerate() {
        if !grid.in_bounds(*start) {
            return Err(ConfigError::OutOfBounds {
                what: "pursuer start",
                cell: *start,
                size,
            });
        }
        if grid.is_wall(*start) {
            return Err(ConfigError::PursuerStartBlocked {
                index,
                cell: *start,
            });
        }
        if config.variant == Variant::Wander {
            if let Some(first) = config.pursuer_starts[..index]
                .iter()
                .position(|other| other == start)
            {
                return Err(ConfigError::OverlappingPursuers {
                    first,
                    second: index,
                    cell: *start,
                });
            }
        }
    }

    let requested = config.num_dots + config.num_pellets;
    let available = grid.free_cells(&collectible_exclusions(config)).len();
    if requested > available {
        return Err(ConfigError::NotEnoughCells {
            requested,
            available,
        });
    }

    Ok(grid)
}

/// Cells collectibles may never be placed on besides walls.
pub fn collectible_exclusions(config: &GameConfig) -> HashSet<Cell> {
    let mut excluded: HashSet<Cell> = config.pursuer_starts.iter().copied().collect();
    excluded.insert(config.spawn);
    excluded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(build_grid(&GameConfig::classic()).is_ok());
        assert!(build_grid(&GameConfig::wander()).is_ok());
    }

    #[test]
    fn free_cells_skip_walls_and_exclusions() {
        let config = GameConfig::wander();
        let grid = build_grid(&config).expect("valid preset");
        let cells = grid.free_cells(&collectible_exclusions(&config));
        assert_eq!(cells.len(), 64 - 6 - 1 - 2);
        assert!(!cells.contains(&config.spawn));
        assert!(cells.iter().all(|cell| !grid.is_wall(*cell)));
    }

    #[test]
    fn rejects_too_many_collectibles() {
        let mut config = GameConfig::wander();
        config.num_dots = 56;
        assert_eq!(
            build_grid(&config),
            Err(ConfigError::NotEnoughCells {
                requested: 56,
                available: 55,
            })
        );
    }

    #[test]
    fn rejects_spawn_on_wall() {
        let mut config = GameConfig::classic();
        config.spawn = Cell::new(0, 2);
        assert_eq!(
            build_grid(&config),
            Err(ConfigError::SpawnBlocked {
                cell: Cell::new(0, 2)
            })
        );
    }

    #[test]
    fn rejects_out_of_bounds_pursuer() {
        let mut config = GameConfig::classic();
        config.pursuer_starts[0] = Cell::new(12, 0);
        assert!(matches!(
            build_grid(&config),
            Err(ConfigError::OutOfBounds {
                what: "pursuer start",
                ..
            })
        ));
    }

    #[test]
    fn wander_rejects_shared_start_but_classic_allows_it() {
        let mut wander = GameConfig::wander();
        wander.pursuer_starts = vec![Cell::new(7, 7), Cell::new(7, 7)];
        assert!(matches!(
            build_grid(&wander),
            Err(ConfigError::OverlappingPursuers {
                first: 0,
                second: 1,
                ..
            })
        ));

        let mut classic = GameConfig::classic();
        classic.pursuer_starts = vec![Cell::new(10, 10), Cell::new(10, 10)];
        assert!(build_grid(&classic).is_ok());
    }

    #[test]
    fn wander_rejects_pellets() {
        let mut config = GameConfig::wander();
        config.num_pellets = 1;
        assert_eq!(
            build_grid(&config),
            Err(ConfigError::PelletsUnsupported { requested: 1 })
        );
    }

    #[test]
    fn rejects_empty_grid() {
        let mut config = GameConfig::classic();
        config.grid_size = 0;
        assert_eq!(build_grid(&config), Err(ConfigError::EmptyGrid { size: 0 }));
    }

    #[test]
    fn rejects_non_positive_lives() {
        let mut config = GameConfig::wander();
        config.max_lives = 0;
        assert_eq!(
            build_grid(&config),
            Err(ConfigError::InvalidLives { lives: 0 })
        );
    }

    #[test]
    fn rejects_config_without_pursuers() {
        let mut config = GameConfig::classic();
        config.pursuer_starts.clear();
        assert_eq!(build_grid(&config), Err(ConfigError::NoPursuers));
    }

    #[test]
    fn rejects_pursuer_starting_on_wall() {
        let mut config = GameConfig::classic();
        config.pursuer_starts[2] = Cell::new(5, 5);
        assert_eq!(
            build_grid(&config),
            Err(ConfigError::PursuerStartBlocked {
                index: 2,
                cell: Cell::new(5, 5),
            })
        );
    }

    #[test]
    fn walkable_respects_bounds_and_walls() {
        let grid = build_grid(&GameConfig::classic()).expect("valid preset");
        assert!(grid.is_walkable(Cell::new(0, 0)));
        assert!(!grid.is_walkable(Cell::new(0, 2)));
        assert!(!grid.is_walkable(Cell::new(-1, 0)));
        assert!(!grid.is_walkable(Cell::new(0, 12)));
    }
}
