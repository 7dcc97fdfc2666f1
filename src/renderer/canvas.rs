//! Canvas2D painter for the browser

use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Palette, SpritePiece, cell_size_for, cell_to_pixel, classify_segments};
use crate::sim::grid::Cell;
use crate::sim::snake::Direction;
use crate::sim::{GamePhase, GameState};

/// Gap between a segment and its cell edge (fraction of a cell)
const SEGMENT_INSET: f64 = 0.12;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    cell_size: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, grid_size: i32) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let mut renderer = Self {
            ctx,
            cell_size: 1.0,
        };
        renderer.resize(canvas.width(), canvas.height(), grid_size);
        Ok(renderer)
    }

    /// Fit the board to the canvas backing size
    pub fn resize(&mut self, width: u32, height: u32, grid_size: i32) {
        self.cell_size = cell_size_for(width.min(height) as f64, grid_size);
        log::debug!("Canvas {}x{}, cell size {}", width, height, self.cell_size);
    }

    pub fn render(&self, state: &GameState, palette: &Palette, show_grid: bool) {
        self.draw_board(state.grid_size, palette, show_grid);

        for &cell in &state.obstacles {
            self.draw_obstacle(cell, palette);
        }
        if let Some(food) = &state.food {
            self.draw_food(food.cell, palette);
        }
        self.draw_snake(state, palette);

        match state.phase {
            GamePhase::Paused => self.draw_banner(state.grid_size, "Paused", palette),
            GamePhase::Over => self.draw_banner(state.grid_size, "Game Over", palette),
            GamePhase::Running => {}
        }
    }

    fn draw_board(&self, grid_size: i32, palette: &Palette, show_grid: bool) {
        let side = self.cell_size * grid_size as f64;
        self.ctx.set_fill_style_str(palette.light);
        self.ctx.fill_rect(0.0, 0.0, side, side);
        if !show_grid {
            return;
        }

        // Checkerboard
        self.ctx.set_fill_style_str(palette.dark);
        for y in 0..grid_size {
            for x in 0..grid_size {
                if (x + y) % 2 == 1 {
                    let (px, py) = cell_to_pixel(Cell::new(x, y), self.cell_size);
                    self.ctx.fill_rect(px, py, self.cell_size, self.cell_size);
                }
            }
        }
    }

    fn draw_obstacle(&self, cell: Cell, palette: &Palette) {
        let (px, py) = cell_to_pixel(cell, self.cell_size);
        let inset = self.cell_size * 0.06;
        self.ctx.set_fill_style_str(palette.obstacle);
        self.ctx.fill_rect(
            px + inset,
            py + inset,
            self.cell_size - 2.0 * inset,
            self.cell_size - 2.0 * inset,
        );
    }

    fn draw_food(&self, cell: Cell, palette: &Palette) {
        let (px, py) = cell_to_pixel(cell, self.cell_size);
        let half = self.cell_size / 2.0;
        self.ctx.set_fill_style_str(palette.food);
        self.ctx.begin_path();
        if self
            .ctx
            .arc(px + half, py + half, half * 0.7, 0.0, 2.0 * PI)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn draw_snake(&self, state: &GameState, palette: &Palette) {
        let body: Vec<Cell> = state.snake.body().collect();
        let pieces = match classify_segments(
            &body,
            state.snake.direction(),
            state.grid_size,
            state.params.wall_mode,
        ) {
            Ok(pieces) => pieces,
            Err(e) => {
                log::warn!("Snake body not drawable: {}", e);
                return;
            }
        };

        // Tail first so the head is painted on top
        for (i, (&cell, piece)) in body.iter().zip(&pieces).enumerate().rev() {
            let colour = if i == 0 { palette.head } else { palette.body };
            self.draw_segment(cell, piece, colour);
            if let SpritePiece::Head(facing) | SpritePiece::Lone(facing) = piece {
                self.draw_eyes(cell, *facing, palette);
            }
        }
    }

    /// Inset square plus a bridge out to each connected side
    fn draw_segment(&self, cell: Cell, piece: &SpritePiece, colour: &str) {
        let (px, py) = cell_to_pixel(cell, self.cell_size);
        let s = self.cell_size;
        let inset = s * SEGMENT_INSET;
        let inner = s - 2.0 * inset;

        self.ctx.set_fill_style_str(colour);
        self.ctx.fill_rect(px + inset, py + inset, inner, inner);

        for side in piece.connections() {
            let (x, y, w, h) = match side {
                Direction::Up => (px + inset, py, inner, inset),
                Direction::Down => (px + inset, py + s - inset, inner, inset),
                Direction::Left => (px, py + inset, inset, inner),
                Direction::Right => (px + s - inset, py + inset, inset, inner),
            };
            self.ctx.fill_rect(x, y, w, h);
        }
    }

    fn draw_eyes(&self, cell: Cell, facing: Direction, palette: &Palette) {
        let (px, py) = cell_to_pixel(cell, self.cell_size);
        let s = self.cell_size;
        let (cx, cy) = (px + s / 2.0, py + s / 2.0);
        let forward = facing.delta().as_dvec2() * (s * 0.18);
        let across = facing.delta().perp().as_dvec2() * (s * 0.18);

        self.ctx.set_fill_style_str(palette.eye);
        for side in [-1.0, 1.0] {
            let ex = cx + forward.x + across.x * side;
            let ey = cy + forward.y + across.y * side;
            self.ctx.begin_path();
            if self.ctx.arc(ex, ey, s * 0.08, 0.0, 2.0 * PI).is_ok() {
                self.ctx.fill();
            }
        }
    }

    fn draw_banner(&self, grid_size: i32, text: &str, palette: &Palette) {
        let side = self.cell_size * grid_size as f64;
        self.ctx.set_fill_style_str(palette.overlay);
        self.ctx.fill_rect(0.0, 0.0, side, side);

        self.ctx.set_fill_style_str(palette.text);
        let font = format!("bold {}px sans-serif", (self.cell_size * 1.4).round());
        self.ctx.set_font(&font);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let _ = self.ctx.fill_text(text, side / 2.0, side / 2.0);
    }
}
