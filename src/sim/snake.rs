//! Snake body and movement

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, WallMode, wrap};
use crate::consts::INITIAL_SNAKE_LENGTH;

/// Movement direction. Screen coordinates: +y points down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit offset of one step
    pub fn delta(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    /// Inverse of [`Direction::delta`] for unit offsets
    pub fn from_delta(delta: IVec2) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.delta() == delta)
    }
}

/// The player's snake, head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    body: VecDeque<Cell>,
    /// Direction applied on the most recent tick
    direction: Direction,
    /// Direction that will be committed on the next tick
    pending: Direction,
}

impl Snake {
    /// Build a straight snake whose body trails behind `head`
    pub fn new(head: Cell, length: usize, direction: Direction) -> Self {
        let length = length.max(1);
        let back = direction.opposite().delta();
        let body = (0..length as i32).map(|i| head + back * i).collect();
        Self {
            body,
            direction,
            pending: direction,
        }
    }

    /// The starting configuration: centred, facing right
    pub fn spawn(grid_size: i32) -> Self {
        Self::new(
            spawn_head(grid_size),
            INITIAL_SNAKE_LENGTH,
            Direction::Right,
        )
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Body cells, head first
    pub fn body(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    /// Body as the ring buffer's two slices (head first), for occupancy checks
    pub fn as_slices(&self) -> (&[Cell], &[Cell]) {
        self.body.as_slices()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    /// Stage a turn for the next tick.
    ///
    /// Reversing onto the neck is ignored. Later requests within the same
    /// tick overwrite earlier ones. Returns whether the request was staged.
    pub fn request_direction(&mut self, requested: Direction) -> bool {
        if requested.is_opposite(self.direction) {
            return false;
        }
        self.pending = requested;
        true
    }

    /// Make the staged direction the committed one
    pub fn commit_direction(&mut self) {
        self.direction = self.pending;
    }

    /// Where the head would land stepping in the committed direction
    pub fn next_head(&self, grid_size: i32, wall_mode: WallMode) -> Cell {
        wrap(self.head() + self.direction.delta(), grid_size, wall_mode)
    }

    /// Move the head to `new_head`; the tail is dropped unless the snake grew
    pub fn advance_to(&mut self, new_head: Cell, grew: bool) {
        self.body.push_front(new_head);
        if !grew {
            self.body.pop_back();
        }
    }

    /// Step one cell in the committed direction, returning the new head
    pub fn advance(&mut self, grid_size: i32, wall_mode: WallMode, grew: bool) -> Cell {
        let head = self.next_head(grid_size, wall_mode);
        self.advance_to(head, grew);
        head
    }
}

/// Head cell of a freshly spawned snake
pub fn spawn_head(grid_size: i32) -> Cell {
    IVec2::new(grid_size / 2, grid_size / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spawn_matches_seed_layout() {
        let snake = Snake::spawn(17);
        let body: Vec<_> = snake.body().collect();
        assert_eq!(
            body,
            vec![IVec2::new(8, 8), IVec2::new(7, 8), IVec2::new(6, 8)]
        );
        assert_eq!(snake.direction(), Direction::Right);
    }

    #[test]
    fn test_advance_shifts_body() {
        let mut snake = Snake::spawn(17);
        snake.advance(17, WallMode::Wrap, false);
        let body: Vec<_> = snake.body().collect();
        assert_eq!(
            body,
            vec![IVec2::new(9, 8), IVec2::new(8, 8), IVec2::new(7, 8)]
        );
    }

    #[test]
    fn test_growth_skips_tail_drop() {
        let mut snake = Snake::spawn(17);
        let tail = snake.tail();
        snake.advance(17, WallMode::Wrap, true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), tail);
    }

    #[test]
    fn test_wraps_at_right_edge() {
        let mut snake = Snake::new(IVec2::new(16, 8), 3, Direction::Right);
        assert_eq!(snake.advance(17, WallMode::Wrap, false), IVec2::new(0, 8));
    }

    #[test]
    fn test_bounded_head_leaves_grid() {
        let snake = Snake::new(IVec2::new(16, 8), 3, Direction::Right);
        assert_eq!(snake.next_head(17, WallMode::Bounded), IVec2::new(17, 8));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut snake = Snake::spawn(17);
        assert!(!snake.request_direction(Direction::Left));
        snake.commit_direction();
        assert_eq!(snake.direction(), Direction::Right);
    }

    #[test]
    fn test_last_request_wins() {
        let mut snake = Snake::spawn(17);
        assert!(snake.request_direction(Direction::Up));
        assert!(snake.request_direction(Direction::Down));
        snake.commit_direction();
        assert_eq!(snake.direction(), Direction::Down);
    }

    #[test]
    fn test_reversal_checked_against_committed_not_pending() {
        let mut snake = Snake::spawn(17);
        snake.request_direction(Direction::Up);
        // Left reverses the committed Right, even though Up is staged
        assert!(!snake.request_direction(Direction::Left));
        assert_eq!(snake.pending_direction(), Direction::Up);
    }

    #[test]
    fn test_from_delta() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_delta(dir.delta()), Some(dir));
        }
        assert_eq!(Direction::from_delta(IVec2::new(1, 1)), None);
    }

    proptest! {
        #[test]
        fn prop_length_changes_only_on_growth(
            turns in proptest::collection::vec((0usize..4, any::<bool>()), 1..60)
        ) {
            let mut snake = Snake::spawn(17);
            for (turn, grew) in turns {
                let before = snake.len();
                snake.request_direction(Direction::ALL[turn]);
                snake.commit_direction();
                snake.advance(17, WallMode::Wrap, grew);
                prop_assert_eq!(snake.len(), before + usize::from(grew));
            }
        }

        #[test]
        fn prop_committed_direction_never_reverses(
            turns in proptest::collection::vec(0usize..4, 1..60)
        ) {
            let mut snake = Snake::spawn(17);
            for turn in turns {
                let before = snake.direction();
                snake.request_direction(Direction::ALL[turn]);
                snake.commit_direction();
                prop_assert!(!snake.direction().is_opposite(before));
                snake.advance(17, WallMode::Wrap, false);
            }
        }
    }
}
