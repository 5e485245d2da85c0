use thiserror::Error;

use crate::types::Cell;

/// Errors raised when a [`GameConfig`](crate::types::GameConfig) cannot produce a playable
/// board.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size must be positive, got {size}")]
    EmptyGrid { size: i32 },
    #[error("{what} at ({}, {}) lies outside the {size}x{size} grid", .cell.row, .cell.col)]
    OutOfBounds {
        what: &'static str,
        cell: Cell,
        size: i32,
    },
    #[error("spawn ({}, {}) is a wall", .cell.row, .cell.col)]
    SpawnBlocked { cell: Cell },
    #[error("pursuer {index} starts on a wall at ({}, {})", .cell.row, .cell.col)]
    PursuerStartBlocked { index: usize, cell: Cell },
    #[error("pursuers {first} and {second} share start cell ({}, {})", .cell.row, .cell.col)]
    OverlappingPursuers {
        first: usize,
        second: usize,
        cell: Cell,
    },
    #[error("at least one pursuer is required")]
    NoPursuers,
    #[error("wander variant does not place power pellets (requested {requested})")]
    PelletsUnsupported { requested: usize },
    #[error("max lives must be positive, got {lives}")]
    InvalidLives { lives: i32 },
    #[error("{requested} collectibles requested but only {available} free cells exist")]
    NotEnoughCells { requested: usize, available: usize },
}
