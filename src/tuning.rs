//! Data-driven game balance
//!
//! Every behavioural difference between difficulties lives in this table.
//! The simulation only ever sees a [`DifficultyParams`] row.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::grid::WallMode;

/// Named difficulty tiers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Difficulty {
    #[default]
    Casual,
    Hard,
    Hell,
    /// Classic rules: solid walls, no clock, no obstacles
    Og,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Casual,
        Difficulty::Hard,
        Difficulty::Hell,
        Difficulty::Og,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Casual => "Casual",
            Difficulty::Hard => "Hard",
            Difficulty::Hell => "Hell",
            Difficulty::Og => "OG",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "casual" | "easy" => Some(Difficulty::Casual),
            "hard" => Some(Difficulty::Hard),
            "hell" => Some(Difficulty::Hell),
            "og" | "classic" => Some(Difficulty::Og),
            _ => None,
        }
    }

    /// The tuning row for this difficulty
    pub fn params(&self) -> DifficultyParams {
        match self {
            Difficulty::Casual => DifficultyParams {
                tick_interval_ms: 100,
                wall_mode: WallMode::Wrap,
                time_limit_secs: Some(30),
                initial_obstacle_cap: 0,
                obstacle_cap_step: 0,
                obstacle_cap_ceiling: 0,
                obstacle_interval_ms: None,
                food_lifetime_ms: None,
                lives: 3,
            },
            Difficulty::Hard => DifficultyParams {
                tick_interval_ms: 75,
                wall_mode: WallMode::Wrap,
                time_limit_secs: Some(60),
                initial_obstacle_cap: 3,
                obstacle_cap_step: 1,
                obstacle_cap_ceiling: 12,
                obstacle_interval_ms: Some(5000),
                food_lifetime_ms: None,
                lives: 2,
            },
            Difficulty::Hell => DifficultyParams {
                tick_interval_ms: 50,
                wall_mode: WallMode::Wrap,
                time_limit_secs: None,
                initial_obstacle_cap: 5,
                obstacle_cap_step: 1,
                obstacle_cap_ceiling: 30,
                obstacle_interval_ms: Some(4000),
                food_lifetime_ms: Some(6000),
                lives: 1,
            },
            Difficulty::Og => DifficultyParams {
                tick_interval_ms: 40,
                wall_mode: WallMode::Bounded,
                time_limit_secs: None,
                initial_obstacle_cap: 0,
                obstacle_cap_step: 0,
                obstacle_cap_ceiling: 0,
                obstacle_interval_ms: None,
                food_lifetime_ms: None,
                lives: 1,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the difficulty table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Cadence of the external tick driver
    pub tick_interval_ms: u32,
    pub wall_mode: WallMode,
    /// `None` = no clock
    pub time_limit_secs: Option<u32>,
    pub initial_obstacle_cap: u32,
    /// Cap growth applied on every obstacle cadence tick
    pub obstacle_cap_step: u32,
    pub obstacle_cap_ceiling: u32,
    /// `None` = obstacles never spawn
    pub obstacle_interval_ms: Option<u32>,
    /// `None` = food never expires
    pub food_lifetime_ms: Option<u32>,
    /// Starting lives (>= 1)
    pub lives: u8,
}

impl DifficultyParams {
    /// Convert a duration into whole ticks at this row's cadence (rounded up, at least 1)
    pub fn ms_to_ticks(&self, ms: u32) -> u32 {
        let interval = self.tick_interval_ms.max(1);
        ms.div_ceil(interval).max(1)
    }

    pub fn time_limit_ticks(&self) -> Option<u32> {
        self.time_limit_secs
            .map(|secs| self.ms_to_ticks(secs.saturating_mul(1000)))
    }

    pub fn obstacle_interval_ticks(&self) -> Option<u32> {
        self.obstacle_interval_ms.map(|ms| self.ms_to_ticks(ms))
    }

    pub fn food_lifetime_ticks(&self) -> Option<u32> {
        self.food_lifetime_ms.map(|ms| self.ms_to_ticks(ms))
    }

    /// Convert a tick count back into whole seconds (rounded up)
    pub fn ticks_to_secs(&self, ticks: u32) -> u32 {
        let ms = u64::from(ticks) * u64::from(self.tick_interval_ms);
        ms.div_ceil(1000) as u32
    }
}
