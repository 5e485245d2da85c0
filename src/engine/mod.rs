use std::collections::{BTreeSet, HashSet};

use log::{debug, info};

use crate::constants::{
    PURSUER_MOVE_INTERVAL, SCORE_PER_CAPTURE, SCORE_PER_DOT, VULNERABLE_MOVES, WANDER_OFFSETS,
};
use crate::error::ConfigError;
use crate::grid::{build_grid, collectible_exclusions, Grid};
use crate::rng::Rng;
use crate::types::{Cell, Direction, GameConfig, GameEvent, PursuerView, Snapshot, Variant};

mod pursuer_system;
mod spawn_system;
mod utils;

use self::utils::step;

#[derive(Clone, Debug)]
struct PursuerInternal {
    cell: Cell,
    start: Cell,
}

/// Grid-chase game state for one session. Every mutation goes through
/// [`move_player`](Self::move_player), [`reset`](Self::reset) or [`restart`](Self::restart).
#[derive(Clone, Debug)]
pub struct GridChaseEngine {
    config: GameConfig,
    grid: Grid,
    rng: Rng,

    player: Cell,
    pursuers: Vec<PursuerInternal>,
    dots: BTreeSet<Cell>,
    pellets: BTreeSet<Cell>,

    score: u32,
    lives: i32,
    vulnerable: bool,
    vulnerable_timer: i32,
    move_count: u64,
    won: bool,
    game_over: bool,
    life_lost: bool,
    events: Vec<GameEvent>,
}

impl GridChaseEngine {
    pub fn new(config: GameConfig, seed: u32) -> Result<Self, ConfigError> {
        let grid = build_grid(&config)?;
        let mut engine = Self {
            player: config.spawn,
            lives: config.max_lives,
            config,
            grid,
            rng: Rng::new(seed),
            pursuers: Vec::new(),
            dots: BTreeSet::new(),
            pellets: BTreeSet::new(),
            score: 0,
            vulnerable: false,
            vulnerable_timer: 0,
            move_count: 0,
            won: false,
            game_over: false,
            life_lost: false,
            events: Vec::new(),
        };
        engine.populate();
        info!(
            "new {:?} game: {}x{} grid, {} dots, {} pellets, {} pursuers",
            engine.config.variant,
            engine.grid.size,
            engine.grid.size,
            engine.dots.len(),
            engine.pellets.len(),
            engine.pursuers.len()
        );
        Ok(engine)
    }

    /// Replaces the configuration and deals a fresh board. On error the current game is left
    /// untouched.
    pub fn reset(&mut self, config: GameConfig) -> Result<Snapshot, ConfigError> {
        let grid = build_grid(&config)?;
        self.config = config;
        self.grid = grid;
        Ok(self.restart())
    }

    /// Deals a fresh board with the current configuration.
    pub fn restart(&mut self) -> Snapshot {
        self.populate();
        info!("{:?} game restarted", self.config.variant);
        self.snapshot()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_ended(&self) -> bool {
        self.won || self.game_over
    }

    /// Raw delta entry point. Anything but a unit orthogonal delta is ignored.
    pub fn move_by(&mut self, dr: i32, dc: i32) -> Snapshot {
        match Direction::from_delta(dr, dc) {
            Some(dir) => self.move_player(dir),
            None => {
                debug!("ignoring invalid move delta ({dr}, {dc})");
                self.clear_notices();
                self.snapshot()
            }
        }
    }

    /// The returned snapshot carries only the events this move produced.
    pub fn move_player(&mut self, dir: Direction) -> Snapshot {
        self.clear_notices();
        if self.is_ended() {
            return self.snapshot();
        }
        match self.config.variant {
            Variant::Classic => self.advance_classic(dir),
            Variant::Wander => self.advance_wander(dir),
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            variant: self.config.variant,
            grid_size: self.grid.size,
            walls: self.grid.walls.iter().copied().collect(),
            spawn: self.config.spawn,
            player: self.player,
            pursuers: self
                .pursuers
                .iter()
                .enumerate()
                .map(|(id, pursuer)| PursuerView {
                    id,
                    cell: pursuer.cell,
                    start: pursuer.start,
                    mode: self.config.variant.pursuer_mode(),
                })
                .collect(),
            dots: self.dots.iter().copied().collect(),
            pellets: self.pellets.iter().copied().collect(),
            vulnerable: self.vulnerable,
            vulnerable_timer: self.vulnerable_timer,
            score: self.score,
            lives: self.lives,
            max_lives: self.config.max_lives,
            move_count: self.move_count,
            won: self.won,
            game_over: self.game_over,
            life_lost: self.life_lost,
            events: self.events.clone(),
        }
    }

    /// Snapshot for a render pass. Draining clears the one-shot `life_lost` notice and the
    /// pending event queue.
    pub fn build_snapshot(&mut self, drain: bool) -> Snapshot {
        let snapshot = self.snapshot();
        if drain {
            self.clear_notices();
        }
        snapshot
    }

    fn clear_notices(&mut self) {
        self.life_lost = false;
        self.events.clear();
    }

    // Pursuers still get their turn when the player bumps into a wall.
    fn advance_classic(&mut self, dir: Direction) {
        self.move_count += 1;
        self.step_player(dir);
        if self.move_count.is_multiple_of(PURSUER_MOVE_INTERVAL) {
            self.chase_step();
            self.resolve_collisions();
        }
        self.decay_vulnerability();
        self.resolve_collisions();
    }

    fn advance_wander(&mut self, dir: Direction) {
        if !self.step_player(dir) {
            return;
        }
        self.move_count += 1;
        self.wander_step();
        self.resolve_collisions();
    }

    /// Returns whether the move was accepted.
    fn step_player(&mut self, dir: Direction) -> bool {
        let target = step(self.player, dir);
        if !self.grid.is_walkable(target) {
            debug!("move {dir:?} from {:?} rejected", self.player);
            self.events.push(GameEvent::MoveRejected { dir });
            return false;
        }
        self.player = target;

        if self.dots.remove(&target) {
            self.score += SCORE_PER_DOT;
            self.events.push(GameEvent::DotEaten { cell: target });
            if self.dots.is_empty() {
                self.won = true;
                self.events.push(GameEvent::Won);
                info!("all dots eaten, score {}", self.score);
            }
        }
        if self.pellets.remove(&target) {
            self.vulnerable = true;
            self.vulnerable_timer = VULNERABLE_MOVES;
            self.events.push(GameEvent::PelletTaken { cell: target });
        }
        true
    }

    fn decay_vulnerability(&mut self) {
        if !self.vulnerable || self.game_over {
            return;
        }
        self.vulnerable_timer -= 1;
        if self.vulnerable_timer <= 0 {
            self.vulnerable = false;
            self.vulnerable_timer = 0;
            self.events.push(GameEvent::VulnerabilityEnded);
        }
    }

    fn resolve_collisions(&mut self) {
        if self.game_over {
            return;
        }
        let hits: Vec<usize> = self
            .pursuers
            .iter()
            .enumerate()
            .filter(|(_, pursuer)| pursuer.cell == self.player)
            .map(|(idx, _)| idx)
            .collect();
        if hits.is_empty() {
            return;
        }

        if self.config.variant == Variant::Classic && self.vulnerable {
            for idx in hits {
                self.score += SCORE_PER_CAPTURE;
                self.pursuers[idx].cell = self.pursuers[idx].start;
                self.events.push(GameEvent::PursuerCaptured { pursuer: idx });
            }
            return;
        }
        self.lose_life();
    }

    // One life per collision check, however many pursuers share the cell.
    fn lose_life(&mut self) {
        self.lives = (self.lives - 1).max(0);
        self.life_lost = true;
        self.events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.game_over = true;
            self.events.push(GameEvent::GameOver);
            info!("out of lives, final score {}", self.score);
        } else {
            debug!("life lost, {} left", self.lives);
        }

        self.player = self.config.spawn;
        if self.config.variant == Variant::Wander {
            for pursuer in &mut self.pursuers {
                pursuer.cell = pursuer.start;
            }
        }
    }
}
