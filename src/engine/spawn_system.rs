use super::*;

impl GridChaseEngine {
    /// Rebuilds every piece of mutable state from `self.config`.
    pub(super) fn populate(&mut self) {
        self.player = self.config.spawn;
        self.spawn_pursuers();
        self.place_collectibles();
        self.score = 0;
        self.lives = self.config.max_lives;
        self.vulnerable = false;
        self.vulnerable_timer = 0;
        self.move_count = 0;
        self.won = false;
        self.game_over = false;
        self.life_lost = false;
        self.events.clear();
    }

    pub(super) fn spawn_pursuers(&mut self) {
        self.pursuers = self
            .config
            .pursuer_starts
            .iter()
            .map(|start| PursuerInternal {
                cell: *start,
                start: *start,
            })
            .collect();
    }

    /// Dots are a uniform sample of the free cells; pellets are sampled from what the dots
    /// left over, so the two sets never share a cell.
    pub(super) fn place_collectibles(&mut self) {
        let pool = self.grid.free_cells(&collectible_exclusions(&self.config));
        let dots = self.rng.sample(&pool, self.config.num_dots);
        let taken: HashSet<Cell> = dots.iter().copied().collect();
        let remaining: Vec<Cell> = pool
            .into_iter()
            .filter(|cell| !taken.contains(cell))
            .collect();
        let pellets = self.rng.sample(&remaining, self.config.num_pellets);

        self.dots = dots.into_iter().collect();
        self.pellets = pellets.into_iter().collect();
    }
}
