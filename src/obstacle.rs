use log::info;

use crate::constants::{
    OBSTACLE_GRAVITY, OBSTACLE_HEIGHT, OBSTACLE_JUMP_STRENGTH, OBSTACLE_PIPE_GAP,
    OBSTACLE_PIPE_WIDTH,
};
use crate::rng::Rng;
use crate::types::ObstacleSnapshot;

/// Side-scrolling obstacle game. The bird sits in column 0 while a single pipe scrolls in
/// from the right. Time only moves when the caller invokes [`advance_tick`](Self::advance_tick).
#[derive(Clone, Debug)]
pub struct ObstacleEngine {
    rng: Rng,
    bird_row: i32,
    pipe_column: i32,
    pipe_gap_start: i32,
    score: u32,
    started: bool,
    game_over: bool,
}

impl ObstacleEngine {
    pub fn new(seed: u32) -> Self {
        let mut engine = Self {
            rng: Rng::new(seed),
            bird_row: 0,
            pipe_column: 0,
            pipe_gap_start: 0,
            score: 0,
            started: false,
            game_over: false,
        };
        engine.reset();
        engine
    }

    pub fn reset(&mut self) -> ObstacleSnapshot {
        self.bird_row = OBSTACLE_HEIGHT / 2;
        self.pipe_column = OBSTACLE_HEIGHT;
        self.pipe_gap_start = self.roll_gap();
        self.score = 0;
        self.started = false;
        self.game_over = false;
        self.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.started && !self.game_over
    }

    pub fn flap(&mut self) -> ObstacleSnapshot {
        if !self.game_over {
            self.bird_row = (self.bird_row + OBSTACLE_JUMP_STRENGTH).min(OBSTACLE_HEIGHT - 1);
            self.started = true;
        }
        self.snapshot()
    }

    /// Gravity, scroll, scoring, then the pipe collision test. No-op before the first flap
    /// and after game over.
    pub fn advance_tick(&mut self) -> ObstacleSnapshot {
        if !self.is_running() {
            return self.snapshot();
        }

        self.bird_row -= OBSTACLE_GRAVITY;
        if self.bird_row < 0 {
            self.bird_row = 0;
            self.game_over = true;
        }

        self.pipe_column -= 1;
        if self.pipe_column < -OBSTACLE_PIPE_WIDTH {
            self.score += 1;
            self.pipe_column = OBSTACLE_HEIGHT;
            self.pipe_gap_start = self.roll_gap();
        }

        if self.pipe_column >= 0 && self.pipe_column < OBSTACLE_PIPE_WIDTH && !self.in_gap() {
            self.game_over = true;
        }
        if self.game_over {
            info!("obstacle run over, score {}", self.score);
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> ObstacleSnapshot {
        ObstacleSnapshot {
            height: OBSTACLE_HEIGHT,
            bird_row: self.bird_row,
            pipe_column: self.pipe_column,
            pipe_gap_start: self.pipe_gap_start,
            pipe_gap_height: OBSTACLE_PIPE_GAP,
            pipe_width: OBSTACLE_PIPE_WIDTH,
            score: self.score,
            started: self.started,
            game_over: self.game_over,
        }
    }

    fn in_gap(&self) -> bool {
        self.bird_row >= self.pipe_gap_start
            && self.bird_row < self.pipe_gap_start + OBSTACLE_PIPE_GAP
    }

    fn roll_gap(&mut self) -> i32 {
        self.rng.int(1, OBSTACLE_HEIGHT - OBSTACLE_PIPE_GAP - 1)
    }
}
