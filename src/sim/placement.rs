//! Random placement of food and obstacles
//!
//! Food must always exist while a free cell does, so it retries without
//! bound. Obstacles give up after a fixed number of draws; a crowded grid
//! simply skips that spawn.

use glam::IVec2;
use rand::Rng;

use super::grid::{Cell, all_cells, chebyshev, is_occupied};
use crate::consts::{OBSTACLE_HEAD_CLEARANCE, OBSTACLE_PLACEMENT_ATTEMPTS};

/// Retry policy for [`place_random`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempts {
    /// Give up after this many draws
    Bounded(u32),
    /// Keep drawing until a free cell comes up (fails only on a full grid)
    Unbounded,
}

/// Draw uniformly random cells until one passes `accept`
pub fn place_where<R, F>(
    rng: &mut R,
    grid_size: i32,
    attempts: Attempts,
    accept: F,
) -> Option<Cell>
where
    R: Rng,
    F: Fn(Cell) -> bool,
{
    let draw = |rng: &mut R| {
        IVec2::new(
            rng.random_range(0..grid_size),
            rng.random_range(0..grid_size),
        )
    };

    match attempts {
        Attempts::Bounded(max) => (0..max).map(|_| draw(rng)).find(|&cell| accept(cell)),
        Attempts::Unbounded => {
            // Rejection sampling only terminates if something is acceptable
            if !all_cells(grid_size).any(&accept) {
                return None;
            }
            loop {
                let cell = draw(rng);
                if accept(cell) {
                    return Some(cell);
                }
            }
        }
    }
}

/// Draw a random cell that is not in any exclusion set
pub fn place_random<R: Rng>(
    rng: &mut R,
    grid_size: i32,
    exclusions: &[&[Cell]],
    attempts: Attempts,
) -> Option<Cell> {
    place_where(rng, grid_size, attempts, |cell| !is_occupied(cell, exclusions))
}

/// Place food anywhere not covered by the snake or an obstacle.
///
/// Returns `None` only when the grid is completely full.
pub fn place_food<R: Rng>(
    rng: &mut R,
    grid_size: i32,
    snake: &[&[Cell]],
    obstacles: &[Cell],
) -> Option<Cell> {
    let mut exclusions: Vec<&[Cell]> = snake.to_vec();
    exclusions.push(obstacles);
    place_random(rng, grid_size, &exclusions, Attempts::Unbounded)
}

/// Place an obstacle clear of everything and outside the square guard zone
/// around each `guarded` head cell.
pub fn place_obstacle<R: Rng>(
    rng: &mut R,
    grid_size: i32,
    occupied: &[&[Cell]],
    guarded: &[Cell],
) -> Option<Cell> {
    place_where(
        rng,
        grid_size,
        Attempts::Bounded(OBSTACLE_PLACEMENT_ATTEMPTS),
        |cell| {
            !is_occupied(cell, occupied)
                && guarded
                    .iter()
                    .all(|&head| chebyshev(cell, head) > OBSTACLE_HEAD_CLEARANCE)
        },
    )
}
