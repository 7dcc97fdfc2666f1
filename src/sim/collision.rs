//! Collision classification for a proposed head position
//!
//! Checked in fixed priority order: wall, self, obstacle, food. A fatal hit
//! short-circuits everything below it, so food under a fatal cell is never
//! eaten.

use serde::{Deserialize, Serialize};

use super::grid::{Cell, WallMode, in_bounds};
use super::snake::Snake;

/// Outcome of moving the head into a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    /// Left the grid in bounded mode
    Wall,
    /// Ran into its own body
    SelfHit,
    Obstacle,
    Food,
    None,
}

impl Collision {
    /// Wall, self and obstacle hits end the current life
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Collision::Wall | Collision::SelfHit | Collision::Obstacle
        )
    }
}

/// Classify moving the snake's head to `head`.
///
/// The tail cell only counts as solid when the snake grows this tick:
/// otherwise it is vacated by the same move and following it is legal.
pub fn resolve(
    head: Cell,
    snake: &Snake,
    obstacles: &[Cell],
    food: Option<Cell>,
    grid_size: i32,
    wall_mode: WallMode,
) -> Collision {
    if wall_mode == WallMode::Bounded && !in_bounds(head, grid_size) {
        return Collision::Wall;
    }

    let grows = food == Some(head);
    let solid = if grows { snake.len() } else { snake.len() - 1 };
    if snake.body().take(solid).any(|segment| segment == head) {
        return Collision::SelfHit;
    }

    if obstacles.contains(&head) {
        return Collision::Obstacle;
    }

    if grows {
        return Collision::Food;
    }

    Collision::None
}
