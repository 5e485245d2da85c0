pub const SCORE_PER_DOT: u32 = 10;
pub const SCORE_PER_CAPTURE: u32 = 100;
pub const MAX_LIVES: i32 = 3;

/// Moves a pellet keeps pursuers vulnerable for.
pub const VULNERABLE_MOVES: i32 = 10;
/// Classic pursuers take a step on every n-th player move attempt.
pub const PURSUER_MOVE_INTERVAL: u64 = 2;

pub const SPAWN: (i32, i32) = (1, 1);

pub const CLASSIC_GRID_SIZE: i32 = 12;
pub const CLASSIC_DOTS: usize = 20;
pub const CLASSIC_PELLETS: usize = 3;
pub const CLASSIC_PURSUER_STARTS: [(i32, i32); 4] = [(10, 10), (10, 1), (1, 10), (6, 6)];
pub const CLASSIC_WALLS: [(i32, i32); 9] = [
    (0, 2),
    (2, 0),
    (4, 2),
    (5, 5),
    (6, 3),
    (3, 6),
    (7, 7),
    (8, 4),
    (2, 9),
];

pub const WANDER_GRID_SIZE: i32 = 8;
pub const WANDER_DOTS: usize = 10;
pub const WANDER_PURSUER_STARTS: [(i32, i32); 2] = [(7, 7), (0, 7)];
pub const WANDER_WALLS: [(i32, i32); 6] = [(0, 2), (2, 0), (4, 2), (5, 5), (6, 3), (3, 6)];

/// Wander candidates: orthogonal, diagonal, then distance-2 jumps.
pub const WANDER_OFFSETS: [(i32, i32); 16] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (-2, 0),
    (2, 0),
    (0, -2),
    (0, 2),
    (2, 2),
    (2, -2),
    (-2, 2),
    (-2, -2),
];

pub const OBSTACLE_GRAVITY: i32 = 1;
pub const OBSTACLE_JUMP_STRENGTH: i32 = 4;
pub const OBSTACLE_HEIGHT: i32 = 15;
pub const OBSTACLE_PIPE_WIDTH: i32 = 2;
pub const OBSTACLE_PIPE_GAP: i32 = 5;
pub const OBSTACLE_TICK_MS: u64 = 200;
