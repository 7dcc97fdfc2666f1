//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete ticks only, cadence owned by the caller
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod events;
pub mod grid;
pub mod placement;
pub mod snake;
pub mod state;
pub mod tick;

pub use autopilot::suggest_direction;
pub use collision::{Collision, resolve};
pub use events::{GameEvent, diff};
pub use grid::{Cell, WallMode};
pub use snake::{Direction, Snake};
pub use state::{Food, GamePhase, GameState};
pub use tick::tick;
