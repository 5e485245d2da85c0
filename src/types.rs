use serde::{Deserialize, Serialize};

use crate::constants::{
    CLASSIC_DOTS, CLASSIC_GRID_SIZE, CLASSIC_PELLETS, CLASSIC_PURSUER_STARTS, CLASSIC_WALLS,
    MAX_LIVES, SPAWN, WANDER_DOTS, WANDER_GRID_SIZE, WANDER_PURSUER_STARTS, WANDER_WALLS,
};

/// Grid coordinate addressed as `(row, col)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, dr: i32, dc: i32) -> Self {
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    pub fn manhattan(self, other: Cell) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Inside a `size` x `size` board anchored at `(0, 0)`.
    pub fn in_bounds(self, size: i32) -> bool {
        self.row >= 0 && self.col >= 0 && self.row < size && self.col < size
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Greedy chase enumerates neighbours in this order; the first minimum wins.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn from_delta(dr: i32, dc: i32) -> Option<Self> {
        match (dr, dc) {
            (-1, 0) => Some(Self::Up),
            (1, 0) => Some(Self::Down),
            (0, -1) => Some(Self::Left),
            (0, 1) => Some(Self::Right),
            _ => None,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Greedy chasers, power pellets, pursuers move every second move.
    Classic,
    /// Randomized wanderers that never share a cell, pursuers move on every accepted move.
    Wander,
}

impl Variant {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "classic" => Some(Self::Classic),
            "wander" => Some(Self::Wander),
            _ => None,
        }
    }

    pub fn pursuer_mode(self) -> PursuerMode {
        match self {
            Self::Classic => PursuerMode::Chase,
            Self::Wander => PursuerMode::Wander,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PursuerMode {
    Chase,
    Wander,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub variant: Variant,
    #[serde(rename = "gridSize")]
    pub grid_size: i32,
    pub walls: Vec<Cell>,
    pub spawn: Cell,
    #[serde(rename = "pursuerStarts")]
    pub pursuer_starts: Vec<Cell>,
    #[serde(rename = "numDots")]
    pub num_dots: usize,
    #[serde(rename = "numPellets")]
    pub num_pellets: usize,
    #[serde(rename = "maxLives")]
    pub max_lives: i32,
}

impl GameConfig {
    pub fn classic() -> Self {
        Self {
            variant: Variant::Classic,
            grid_size: CLASSIC_GRID_SIZE,
            walls: CLASSIC_WALLS.iter().copied().map(Cell::from).collect(),
            spawn: Cell::from(SPAWN),
            pursuer_starts: CLASSIC_PURSUER_STARTS
                .iter()
                .copied()
                .map(Cell::from)
                .collect(),
            num_dots: CLASSIC_DOTS,
            num_pellets: CLASSIC_PELLETS,
            max_lives: MAX_LIVES,
        }
    }

    pub fn wander() -> Self {
        Self {
            variant: Variant::Wander,
            grid_size: WANDER_GRID_SIZE,
            walls: WANDER_WALLS.iter().copied().map(Cell::from).collect(),
            spawn: Cell::from(SPAWN),
            pursuer_starts: WANDER_PURSUER_STARTS
                .iter()
                .copied()
                .map(Cell::from)
                .collect(),
            num_dots: WANDER_DOTS,
            num_pellets: 0,
            max_lives: MAX_LIVES,
        }
    }

    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::classic(),
            Variant::Wander => Self::wander(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PursuerView {
    pub id: usize,
    pub cell: Cell,
    pub start: Cell,
    pub mode: PursuerMode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    DotEaten {
        cell: Cell,
    },
    PelletTaken {
        cell: Cell,
    },
    PursuerCaptured {
        pursuer: usize,
    },
    LifeLost {
        #[serde(rename = "livesLeft")]
        lives_left: i32,
    },
    VulnerabilityEnded,
    MoveRejected {
        dir: Direction,
    },
    Won,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub variant: Variant,
    #[serde(rename = "gridSize")]
    pub grid_size: i32,
    pub walls: Vec<Cell>,
    pub spawn: Cell,
    pub player: Cell,
    pub pursuers: Vec<PursuerView>,
    pub dots: Vec<Cell>,
    pub pellets: Vec<Cell>,
    pub vulnerable: bool,
    #[serde(rename = "vulnerableTimer")]
    pub vulnerable_timer: i32,
    pub score: u32,
    pub lives: i32,
    #[serde(rename = "maxLives")]
    pub max_lives: i32,
    #[serde(rename = "moveCount")]
    pub move_count: u64,
    pub won: bool,
    #[serde(rename = "gameOver")]
    pub game_over: bool,
    #[serde(rename = "lifeLost")]
    pub life_lost: bool,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn is_terminal(&self) -> bool {
        self.won || self.game_over
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        cell.in_bounds(self.grid_size) && !self.walls.contains(&cell)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ObstacleSnapshot {
    pub height: i32,
    #[serde(rename = "birdRow")]
    pub bird_row: i32,
    #[serde(rename = "pipeColumn")]
    pub pipe_column: i32,
    #[serde(rename = "pipeGapStart")]
    pub pipe_gap_start: i32,
    #[serde(rename = "pipeGapHeight")]
    pub pipe_gap_height: i32,
    #[serde(rename = "pipeWidth")]
    pub pipe_width: i32,
    pub score: u32,
    pub started: bool,
    #[serde(rename = "gameOver")]
    pub game_over: bool,
}
