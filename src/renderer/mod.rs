//! Rendering helpers
//!
//! Everything here reads a snapshot; nothing mutates game state. The pure
//! mapping (cells to pixels, segment sprites, HUD text) is platform
//! independent, the Canvas2D painter only exists in the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use thiserror::Error;

use crate::sim::grid::{Cell, WallMode, axis_delta};
use crate::sim::snake::Direction;

/// Top-left pixel of a cell
#[inline]
pub fn cell_to_pixel(cell: Cell, cell_size: f64) -> (f64, f64) {
    (cell.x as f64 * cell_size, cell.y as f64 * cell_size)
}

/// Largest whole cell size that fits `pixels` across the board
pub fn cell_size_for(pixels: f64, grid_size: i32) -> f64 {
    (pixels / grid_size.max(1) as f64).floor().max(1.0)
}

/// The four ways a body segment can bend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Corner {
    /// Corner joining two perpendicular sides
    fn joining(a: Direction, b: Direction) -> Option<Corner> {
        use Direction::*;
        let corner = match (a, b) {
            (Up, Left) | (Left, Up) => Corner::UpLeft,
            (Up, Right) | (Right, Up) => Corner::UpRight,
            (Down, Left) | (Left, Down) => Corner::DownLeft,
            (Down, Right) | (Right, Down) => Corner::DownRight,
            _ => return None,
        };
        Some(corner)
    }

    pub fn sides(&self) -> [Direction; 2] {
        match self {
            Corner::UpLeft => [Direction::Up, Direction::Left],
            Corner::UpRight => [Direction::Up, Direction::Right],
            Corner::DownLeft => [Direction::Down, Direction::Left],
            Corner::DownRight => [Direction::Down, Direction::Right],
        }
    }
}

/// How one snake segment is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpritePiece {
    /// Single-segment snake
    Lone(Direction),
    /// Facing the direction of travel
    Head(Direction),
    /// Pointing away from the segment it follows
    Tail(Direction),
    Straight { horizontal: bool },
    Corner(Corner),
}

impl SpritePiece {
    /// Sides of the cell this piece connects to its neighbours through
    pub fn connections(&self) -> Vec<Direction> {
        match self {
            SpritePiece::Lone(_) => Vec::new(),
            SpritePiece::Head(d) | SpritePiece::Tail(d) => vec![d.opposite()],
            SpritePiece::Straight { horizontal: true } => vec![Direction::Left, Direction::Right],
            SpritePiece::Straight { horizontal: false } => vec![Direction::Up, Direction::Down],
            SpritePiece::Corner(c) => c.sides().to_vec(),
        }
    }
}

/// A body that cannot be drawn as a connected chain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteError {
    #[error("segments {0} and {1} are not adjacent")]
    NotAdjacent(usize, usize),
    #[error("segment {0} folds back onto itself")]
    Folded(usize),
}

/// Direction of the single step `from -> to`, wrap-aware
fn step(from: Cell, to: Cell, grid_size: i32, wall_mode: WallMode) -> Option<Direction> {
    let delta = Cell::new(
        axis_delta(from.x, to.x, grid_size, wall_mode),
        axis_delta(from.y, to.y, grid_size, wall_mode),
    );
    Direction::from_delta(delta)
}

/// Sprite for every segment, head first.
///
/// Orientation comes only from the deltas between consecutive cells;
/// `facing` is used for a single-segment snake.
pub fn classify_segments(
    body: &[Cell],
    facing: Direction,
    grid_size: i32,
    wall_mode: WallMode,
) -> Result<Vec<SpritePiece>, SpriteError> {
    if body.len() <= 1 {
        return Ok(body.iter().map(|_| SpritePiece::Lone(facing)).collect());
    }

    // towards[i] = direction from body[i] to body[i + 1]
    let towards = body
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            step(pair[0], pair[1], grid_size, wall_mode).ok_or(SpriteError::NotAdjacent(i, i + 1))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let last = body.len() - 1;
    let mut pieces = Vec::with_capacity(body.len());
    pieces.push(SpritePiece::Head(towards[0].opposite()));

    for i in 1..last {
        let to_head = towards[i - 1].opposite();
        let to_tail = towards[i];
        let piece = if to_head == to_tail {
            return Err(SpriteError::Folded(i));
        } else if to_head.is_opposite(to_tail) {
            SpritePiece::Straight {
                horizontal: matches!(to_tail, Direction::Left | Direction::Right),
            }
        } else {
            match Corner::joining(to_head, to_tail) {
                Some(corner) => SpritePiece::Corner(corner),
                None => return Err(SpriteError::Folded(i)),
            }
        };
        pieces.push(piece);
    }

    pieces.push(SpritePiece::Tail(towards[last - 1]));
    Ok(pieces)
}

/// HUD clock: `m:ss`, or `∞` when there is no limit
pub fn format_time(secs: Option<u32>) -> String {
    match secs {
        Some(s) => format!("{}:{:02}", s / 60, s % 60),
        None => "∞".to_string(),
    }
}

/// Board colours as CSS strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub light: &'static str,
    pub dark: &'static str,
    pub head: &'static str,
    pub body: &'static str,
    pub eye: &'static str,
    pub food: &'static str,
    pub obstacle: &'static str,
    pub overlay: &'static str,
    pub text: &'static str,
}

impl Palette {
    pub const STANDARD: Palette = Palette {
        light: "#90EE90",
        dark: "#7CCD7C",
        head: "#1E5AA8",
        body: "#3A7BD5",
        eye: "#FFFFFF",
        food: "#E53935",
        obstacle: "#5D4037",
        overlay: "rgba(0, 0, 0, 0.55)",
        text: "#FFFFFF",
    };

    pub const HIGH_CONTRAST: Palette = Palette {
        light: "#FFFFFF",
        dark: "#E0E0E0",
        head: "#000000",
        body: "#202020",
        eye: "#FFFF00",
        food: "#D50000",
        obstacle: "#6200EA",
        overlay: "rgba(0, 0, 0, 0.75)",
        text: "#FFFF00",
    };

    pub fn for_settings(high_contrast: bool) -> Palette {
        if high_contrast {
            Self::HIGH_CONTRAST
        } else {
            Self::STANDARD
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    const N: i32 = 17;

    fn cells(points: &[(i32, i32)]) -> Vec<Cell> {
        points.iter().map(|&(x, y)| IVec2::new(x, y)).collect()
    }

    #[test]
    fn test_cell_to_pixel() {
        assert_eq!(cell_to_pixel(IVec2::new(3, 2), 20.0), (60.0, 40.0));
        assert_eq!(cell_size_for(510.0, N), 30.0);
        assert_eq!(cell_size_for(5.0, N), 1.0);
    }

    #[test]
    fn test_straight_snake() {
        let body = cells(&[(8, 8), (7, 8), (6, 8)]);
        let pieces = classify_segments(&body, Direction::Right, N, WallMode::Wrap).unwrap();
        assert_eq!(
            pieces,
            vec![
                SpritePiece::Head(Direction::Right),
                SpritePiece::Straight { horizontal: true },
                SpritePiece::Tail(Direction::Left),
            ]
        );
    }

    #[test]
    fn test_every_corner_is_classified() {
        // Head moved up after travelling right: body bends from Left to Up
        let body = cells(&[(5, 4), (5, 5), (4, 5)]);
        let pieces = classify_segments(&body, Direction::Up, N, WallMode::Bounded).unwrap();
        assert_eq!(pieces[0], SpritePiece::Head(Direction::Up));
        assert_eq!(pieces[1], SpritePiece::Corner(Corner::UpLeft));

        let cases = [
            (cells(&[(5, 4), (5, 5), (6, 5)]), Corner::UpRight),
            (cells(&[(5, 6), (5, 5), (4, 5)]), Corner::DownLeft),
            (cells(&[(5, 6), (5, 5), (6, 5)]), Corner::DownRight),
        ];
        for (body, corner) in cases {
            let pieces = classify_segments(&body, Direction::Up, N, WallMode::Bounded).unwrap();
            assert_eq!(pieces[1], SpritePiece::Corner(corner));
        }
    }

    #[test]
    fn test_wrapped_body_stays_connected() {
        // Head just crossed the right edge
        let body = cells(&[(0, 3), (16, 3), (15, 3)]);
        let pieces = classify_segments(&body, Direction::Right, N, WallMode::Wrap).unwrap();
        assert_eq!(pieces[0], SpritePiece::Head(Direction::Right));
        assert_eq!(pieces[1], SpritePiece::Straight { horizontal: true });

        // Same cells are a gap on a bounded board
        assert_eq!(
            classify_segments(&body, Direction::Right, N, WallMode::Bounded),
            Err(SpriteError::NotAdjacent(0, 1))
        );
    }

    #[test]
    fn test_single_segment() {
        let body = cells(&[(2, 2)]);
        let pieces = classify_segments(&body, Direction::Down, N, WallMode::Wrap).unwrap();
        assert_eq!(pieces, vec![SpritePiece::Lone(Direction::Down)]);
        assert!(pieces[0].connections().is_empty());
    }

    #[test]
    fn test_connections_point_at_neighbours() {
        let body = cells(&[(5, 4), (5, 5), (4, 5)]);
        let pieces = classify_segments(&body, Direction::Up, N, WallMode::Wrap).unwrap();
        assert_eq!(pieces[0].connections(), vec![Direction::Down]);
        assert_eq!(pieces[2].connections(), vec![Direction::Right]);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Some(60)), "1:00");
        assert_eq!(format_time(Some(9)), "0:09");
        assert_eq!(format_time(None), "∞");
    }
}
