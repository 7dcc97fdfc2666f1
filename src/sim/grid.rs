//! Grid geometry
//!
//! Pure coordinate math shared by placement, kinematics and collision.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A grid cell `(x, y)`, 0-indexed. Compared by value.
///
/// Signed so that a proposed head in [`WallMode::Bounded`] can sit outside the grid.
pub type Cell = IVec2;

/// What happens when the snake leaves the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallMode {
    /// Toroidal: leaving one edge enters the opposite one
    Wrap,
    /// Leaving the grid is a wall collision
    Bounded,
}

/// Apply the wall mode to a cell.
///
/// `Wrap` folds the cell back onto the torus; `Bounded` returns it unchanged
/// (bounds are checked by the collision resolver, not corrected here).
#[inline]
pub fn wrap(cell: Cell, grid_size: i32, wall_mode: WallMode) -> Cell {
    match wall_mode {
        WallMode::Wrap => IVec2::new(
            cell.x.rem_euclid(grid_size),
            cell.y.rem_euclid(grid_size),
        ),
        WallMode::Bounded => cell,
    }
}

/// True when `cell` lies inside `[0, grid_size)` on both axes
#[inline]
pub fn in_bounds(cell: Cell, grid_size: i32) -> bool {
    (0..grid_size).contains(&cell.x) && (0..grid_size).contains(&cell.y)
}

/// True if `cell` equals any member of any supplied occupant set
pub fn is_occupied(cell: Cell, occupants: &[&[Cell]]) -> bool {
    occupants.iter().any(|set| set.contains(&cell))
}

/// Chebyshev (king-move) distance
#[inline]
pub fn chebyshev(a: Cell, b: Cell) -> i32 {
    (a - b).abs().max_element()
}

/// Shortest signed step from `from` to `to` along one axis, accounting for wrap
#[inline]
pub fn axis_delta(from: i32, to: i32, grid_size: i32, wall_mode: WallMode) -> i32 {
    let raw = to - from;
    match wall_mode {
        WallMode::Bounded => raw,
        WallMode::Wrap => {
            let d = raw.rem_euclid(grid_size);
            if d > grid_size / 2 { d - grid_size } else { d }
        }
    }
}

/// Manhattan distance, wrap-aware
pub fn manhattan(a: Cell, b: Cell, grid_size: i32, wall_mode: WallMode) -> i32 {
    let dx = axis_delta(a.x, b.x, grid_size, wall_mode);
    let dy = axis_delta(a.y, b.y, grid_size, wall_mode);
    dx.abs() + dy.abs()
}

/// Iterate every cell of the grid in row-major order
pub fn all_cells(grid_size: i32) -> impl Iterator<Item = Cell> {
    (0..grid_size).flat_map(move |y| (0..grid_size).map(move |x| IVec2::new(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_folds_negative_and_overflow() {
        assert_eq!(wrap(IVec2::new(17, 8), 17, WallMode::Wrap), IVec2::new(0, 8));
        assert_eq!(wrap(IVec2::new(-1, 8), 17, WallMode::Wrap), IVec2::new(16, 8));
        assert_eq!(wrap(IVec2::new(4, -1), 17, WallMode::Wrap), IVec2::new(4, 16));
    }

    #[test]
    fn test_bounded_does_not_correct() {
        let outside = IVec2::new(17, 8);
        assert_eq!(wrap(outside, 17, WallMode::Bounded), outside);
        assert!(!in_bounds(outside, 17));
        assert!(in_bounds(IVec2::new(16, 0), 17));
        assert!(!in_bounds(IVec2::new(0, -1), 17));
    }

    #[test]
    fn test_is_occupied_checks_every_set() {
        let snake = [IVec2::new(1, 1), IVec2::new(2, 1)];
        let obstacles = [IVec2::new(5, 5)];
        assert!(is_occupied(IVec2::new(2, 1), &[&snake, &obstacles]));
        assert!(is_occupied(IVec2::new(5, 5), &[&snake, &obstacles]));
        assert!(!is_occupied(IVec2::new(3, 3), &[&snake, &obstacles]));
        assert!(!is_occupied(IVec2::new(3, 3), &[]));
    }

    #[test]
    fn test_chebyshev_is_square() {
        let head = IVec2::new(8, 8);
        assert_eq!(chebyshev(head, IVec2::new(10, 10)), 2);
        assert_eq!(chebyshev(head, IVec2::new(11, 8)), 3);
        assert_eq!(chebyshev(head, IVec2::new(6, 9)), 2);
    }

    #[test]
    fn test_wrap_aware_distance() {
        let a = IVec2::new(0, 8);
        let b = IVec2::new(16, 8);
        assert_eq!(manhattan(a, b, 17, WallMode::Wrap), 1);
        assert_eq!(manhattan(a, b, 17, WallMode::Bounded), 16);
        assert_eq!(axis_delta(16, 0, 17, WallMode::Wrap), 1);
    }

    proptest! {
        #[test]
        fn prop_wrap_always_lands_in_bounds(x in -1000i32..1000, y in -1000i32..1000) {
            let cell = wrap(IVec2::new(x, y), 17, WallMode::Wrap);
            prop_assert!(in_bounds(cell, 17));
        }
    }
}
