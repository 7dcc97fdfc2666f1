//! Snake King - grid Snake with difficulty tiers
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `renderer`: Cell/sprite mapping and the browser canvas painter
//! - `platform`: Browser/native platform abstraction
//! - `highscores`: Leaderboard and personal bests
//! - `audio`: Event sounds (Web Audio in the browser)

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, LocalLeaderboard, PersonalBests};
pub use settings::Settings;
pub use tuning::{Difficulty, DifficultyParams};

/// Game configuration constants
pub mod consts {
    /// Cells per side of the board
    pub const GRID_SIZE: i32 = 17;
    /// Segments in a freshly spawned snake
    pub const INITIAL_SNAKE_LENGTH: usize = 3;
    /// Score awarded per food
    pub const POINTS_PER_FOOD: u64 = 1;

    /// Obstacles must be further than this (Chebyshev) from a guarded head
    pub const OBSTACLE_HEAD_CLEARANCE: i32 = 2;
    /// Random draws before an obstacle spawn is skipped
    pub const OBSTACLE_PLACEMENT_ATTEMPTS: u32 = 20;

    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
}
