//! Game state and core simulation types
//!
//! `GameState` is the single authoritative aggregate. Only the request
//! methods below and [`super::tick::tick`] mutate it; renderers and audio
//! read snapshots.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Cell;
use super::placement::place_food;
use super::snake::{Direction, Snake};
use crate::consts::GRID_SIZE;
use crate::tuning::{Difficulty, DifficultyParams};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks advance the snake
    Running,
    /// Ticks are ignored until resumed
    Paused,
    /// Run ended; only a restart leaves this phase
    Over,
}

/// The single food item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub cell: Cell,
    /// Ticks until the food moves elsewhere (`None` = never expires)
    pub ttl_ticks: Option<u32>,
}

/// RNG state wrapper for serialization
///
/// The seed is rolled forward after every use, so the state alone is
/// enough to continue the random sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    /// Number of times the generator has been drawn from
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }

    /// Run `f` with a generator and advance the stored seed past it
    pub fn with_rng<T>(&mut self, f: impl FnOnce(&mut Pcg32) -> T) -> T {
        let mut rng = self.to_rng();
        let out = f(&mut rng);
        self.seed = rng.next_u64();
        self.stream += 1;
        out
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Difficulty the session was started with (for records only)
    pub difficulty: Difficulty,
    /// Tuning row driving all behaviour
    pub params: DifficultyParams,
    /// Cells per side
    pub grid_size: i32,
    pub snake: Snake,
    pub food: Option<Food>,
    /// Obstacles in placement order
    pub obstacles: Vec<Cell>,
    /// Obstacles allowed right now; grows toward the row's ceiling
    pub obstacle_cap: u32,
    pub score: u64,
    pub lives: u8,
    /// Remaining time in ticks (`None` = unbounded)
    pub time_left_ticks: Option<u32>,
    /// Simulation tick counter (Running ticks only)
    pub time_ticks: u64,
    pub phase: GamePhase,
}

impl GameState {
    /// Create a new game at the standard grid size
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_params(difficulty, difficulty.params(), GRID_SIZE, seed)
    }

    /// Create a new game from an explicit tuning row
    pub fn with_params(
        difficulty: Difficulty,
        params: DifficultyParams,
        grid_size: i32,
        seed: u64,
    ) -> Self {
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            difficulty,
            params,
            grid_size,
            snake: Snake::spawn(grid_size),
            food: None,
            obstacles: Vec::new(),
            obstacle_cap: params.initial_obstacle_cap.min(params.obstacle_cap_ceiling),
            score: 0,
            lives: params.lives.max(1),
            time_left_ticks: params.time_limit_ticks(),
            time_ticks: 0,
            phase: GamePhase::Running,
        };

        state.spawn_food();
        log::debug!(
            "New {} game (seed {}), food at {:?}",
            difficulty,
            seed,
            state.food.map(|f| f.cell)
        );

        state
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Remaining time in whole seconds (`None` = unbounded)
    pub fn time_left_secs(&self) -> Option<u32> {
        self.time_left_ticks
            .map(|ticks| self.params.ticks_to_secs(ticks))
    }

    /// Immutable copy for renderers and audio
    pub fn snapshot(&self) -> GameState {
        self.clone()
    }

    // === Requests from input ===

    /// Stage a turn for the next tick. Ignored unless running.
    pub fn request_direction(&mut self, direction: Direction) {
        if self.phase != GamePhase::Running {
            return;
        }
        if !self.snake.request_direction(direction) {
            log::debug!("Ignored reversal to {:?}", direction);
        }
    }

    pub fn request_pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
            log::info!("Paused at tick {}", self.time_ticks);
        }
    }

    pub fn request_resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
            log::info!("Resumed");
        }
    }

    /// Pause if running, resume if paused
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.request_pause(),
            GamePhase::Paused => self.request_resume(),
            GamePhase::Over => {}
        }
    }

    /// Replace a finished game with a fresh one at the same difficulty
    pub fn request_restart(&mut self) {
        if self.phase != GamePhase::Over {
            return;
        }
        let seed = self.rng_state.with_rng(|rng| rng.next_u64());
        *self = Self::with_params(self.difficulty, self.params, self.grid_size, seed);
        log::info!("Restarted {} game with seed {}", self.difficulty, seed);
    }

    // === Helpers for the tick ===

    /// Move the food to a free cell other than the one it is on.
    ///
    /// Returns false, leaving the food untouched, if there is no such cell.
    pub(crate) fn spawn_food(&mut self) -> bool {
        let grid_size = self.grid_size;
        let stale: Vec<Cell> = self.food.iter().map(|f| f.cell).collect();
        let (front, back) = self.snake.as_slices();
        let obstacles = &self.obstacles;
        let placed = self.rng_state.with_rng(|rng| {
            place_food(rng, grid_size, &[front, back, stale.as_slice()], obstacles)
        });

        let Some(cell) = placed else {
            return false;
        };
        self.food = Some(Food {
            cell,
            ttl_ticks: self.params.food_lifetime_ticks(),
        });
        true
    }
}
