//! Fixed-cadence simulation tick
//!
//! Advances the game state by one discrete step. The external driver owns
//! the cadence (see `DifficultyParams::tick_interval_ms`); everything that
//! used to run on its own timer (movement, food expiry, obstacle spawns,
//! the countdown) is ordered here.

use super::collision::{self, Collision};
use super::placement::place_obstacle;
use super::snake::{Snake, spawn_head};
use super::state::{GamePhase, GameState};
use crate::consts::POINTS_PER_FOOD;

/// Advance the game state by one tick.
///
/// Returns the move outcome, or `None` if the game is paused or over.
pub fn tick(state: &mut GameState) -> Option<Collision> {
    // Don't tick if paused or game over
    if state.phase != GamePhase::Running {
        return None;
    }

    state.time_ticks += 1;
    state.snake.commit_direction();

    let grid_size = state.grid_size;
    let wall_mode = state.params.wall_mode;
    let head = state.snake.next_head(grid_size, wall_mode);
    let outcome = collision::resolve(
        head,
        &state.snake,
        &state.obstacles,
        state.food.map(|f| f.cell),
        grid_size,
        wall_mode,
    );

    let food_respawned = match outcome {
        Collision::Wall | Collision::SelfHit | Collision::Obstacle => lose_life(state, outcome),
        Collision::Food => {
            state.snake.advance_to(head, true);
            state.score += POINTS_PER_FOOD;
            log::debug!("Ate food at {:?}, score {}", head, state.score);
            respawn_food(state);
            true
        }
        Collision::None => {
            state.snake.advance_to(head, false);
            false
        }
    };

    // Food placed this tick starts its countdown on the next one
    if !food_respawned {
        update_food_lifetime(state);
    }
    update_obstacles(state);

    if state.phase == GamePhase::Running {
        update_clock(state);
    }

    Some(outcome)
}

/// Fatal hit: spend a life or end the run.
///
/// Returns true if the food had to move off the respawned snake.
fn lose_life(state: &mut GameState, cause: Collision) -> bool {
    state.lives = state.lives.saturating_sub(1);

    if state.lives == 0 {
        state.phase = GamePhase::Over;
        log::info!(
            "Game over ({:?}) after {} ticks, score {}",
            cause,
            state.time_ticks,
            state.score
        );
        return false;
    }

    state.snake = Snake::spawn(state.grid_size);
    log::info!("Lost a life ({:?}), {} left", cause, state.lives);

    match state.food {
        Some(food) if state.snake.contains(food.cell) => {
            respawn_food(state);
            true
        }
        _ => false,
    }
}

fn respawn_food(state: &mut GameState) {
    if !state.spawn_food() {
        // Snake and obstacles cover the whole grid
        state.food = None;
        state.phase = GamePhase::Over;
        log::info!("Board full, game over with score {}", state.score);
    }
}

fn update_food_lifetime(state: &mut GameState) {
    let Some(food) = state.food.as_mut() else {
        return;
    };
    let Some(ttl) = food.ttl_ticks.as_mut() else {
        return;
    };

    *ttl = ttl.saturating_sub(1);
    if *ttl == 0 {
        log::debug!("Food at {:?} expired", food.cell);
        if !state.spawn_food() {
            // Nowhere else to go: stay put with a fresh lifetime
            let lifetime = state.params.food_lifetime_ticks();
            if let Some(food) = state.food.as_mut() {
                food.ttl_ticks = lifetime;
            }
        }
    }
}

fn update_obstacles(state: &mut GameState) {
    let Some(every) = state.params.obstacle_interval_ticks() else {
        return;
    };
    if state.time_ticks % u64::from(every) != 0 {
        return;
    }

    if (state.obstacles.len() as u32) < state.obstacle_cap {
        let grid_size = state.grid_size;
        let guarded = [state.snake.head(), spawn_head(grid_size)];
        let food: Vec<_> = state.food.iter().map(|f| f.cell).collect();
        let (front, back) = state.snake.as_slices();
        let obstacles = state.obstacles.as_slice();

        let occupied = [front, back, food.as_slice(), obstacles];
        let placed = state
            .rng_state
            .with_rng(|rng| place_obstacle(rng, grid_size, &occupied, &guarded));

        match placed {
            Some(cell) => {
                state.obstacles.push(cell);
                log::debug!("Obstacle {} placed at {:?}", state.obstacles.len(), cell);
            }
            None => log::debug!("No room for an obstacle this time"),
        }
    }

    let params = &state.params;
    state.obstacle_cap =
        (state.obstacle_cap + params.obstacle_cap_step).min(params.obstacle_cap_ceiling);
}

fn update_clock(state: &mut GameState) {
    let Some(ticks) = state.time_left_ticks.as_mut() else {
        return;
    };

    *ticks = ticks.saturating_sub(1);
    if *ticks == 0 {
        state.phase = GamePhase::Over;
        log::info!("Time's up, score {}", state.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::OBSTACLE_HEAD_CLEARANCE;
    use crate::sim::grid::{Cell, WallMode, all_cells, chebyshev};
    use crate::sim::snake::Direction;
    use crate::sim::state::Food;
    use crate::tuning::{Difficulty, DifficultyParams};
    use glam::IVec2;

    fn params(wall_mode: WallMode, lives: u8) -> DifficultyParams {
        DifficultyParams {
            tick_interval_ms: 100,
            wall_mode,
            time_limit_secs: None,
            initial_obstacle_cap: 0,
            obstacle_cap_step: 0,
            obstacle_cap_ceiling: 0,
            obstacle_interval_ms: None,
            food_lifetime_ms: None,
            lives,
        }
    }

    fn game(wall_mode: WallMode, lives: u8) -> GameState {
        let mut state =
            GameState::with_params(Difficulty::Casual, params(wall_mode, lives), 17, 12345);
        park_food(&mut state, IVec2::new(0, 0));
        state
    }

    fn park_food(state: &mut GameState, cell: Cell) {
        state.food = Some(Food {
            cell,
            ttl_ticks: None,
        });
    }

    fn body(state: &GameState) -> Vec<Cell> {
        state.snake.body().collect()
    }

    #[test]
    fn test_plain_move() {
        let mut state = game(WallMode::Wrap, 1);
        assert_eq!(tick(&mut state), Some(Collision::None));
        assert_eq!(
            body(&state),
            vec![IVec2::new(9, 8), IVec2::new(8, 8), IVec2::new(7, 8)]
        );
    }

    #[test]
    fn test_wraps_at_edge() {
        let mut state = game(WallMode::Wrap, 1);
        state.snake = Snake::new(IVec2::new(16, 8), 3, Direction::Right);
        tick(&mut state);
        assert_eq!(state.snake.head(), IVec2::new(0, 8));
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_bounded_wall_ends_last_life() {
        let mut state = game(WallMode::Bounded, 1);
        state.snake = Snake::new(IVec2::new(16, 8), 3, Direction::Right);
        assert_eq!(tick(&mut state), Some(Collision::Wall));
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_lost_life_resets_snake() {
        let mut state = game(WallMode::Bounded, 2);
        state.score = 7;
        state.obstacles.push(IVec2::new(2, 2));
        state.snake = Snake::new(IVec2::new(16, 3), 5, Direction::Right);

        assert_eq!(tick(&mut state), Some(Collision::Wall));

        assert_eq!(state.lives, 1);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 7);
        assert_eq!(state.obstacles, vec![IVec2::new(2, 2)]);
        assert_eq!(
            body(&state),
            vec![IVec2::new(8, 8), IVec2::new(7, 8), IVec2::new(6, 8)]
        );
        assert_eq!(state.snake.direction(), Direction::Right);
    }

    #[test]
    fn test_reset_moves_food_off_respawned_body() {
        let mut state = game(WallMode::Bounded, 2);
        park_food(&mut state, IVec2::new(7, 8));
        state.snake = Snake::new(IVec2::new(16, 3), 3, Direction::Right);
        tick(&mut state);
        let food = state.food.expect("food respawned");
        assert!(!state.snake.contains(food.cell));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut state = game(WallMode::Wrap, 1);
        park_food(&mut state, IVec2::new(9, 8));

        assert_eq!(tick(&mut state), Some(Collision::Food));
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.score, POINTS_PER_FOOD);

        let food = state.food.expect("food respawned");
        assert!(!state.snake.contains(food.cell));
        assert!(!state.obstacles.contains(&food.cell));
    }

    #[test]
    fn test_obstacle_is_fatal() {
        let mut state = game(WallMode::Wrap, 1);
        state.obstacles.push(IVec2::new(9, 8));
        assert_eq!(tick(&mut state), Some(Collision::Obstacle));
        assert!(state.is_over());
    }

    #[test]
    fn test_self_collision() {
        let mut state = game(WallMode::Wrap, 1);
        state.snake = Snake::new(IVec2::new(8, 8), 5, Direction::Right);
        for dir in [Direction::Up, Direction::Left] {
            state.request_direction(dir);
            assert_eq!(tick(&mut state), Some(Collision::None));
        }
        // (7,7) -> (7,8) lands on the fourth segment, not the tail
        state.request_direction(Direction::Down);
        assert_eq!(tick(&mut state), Some(Collision::SelfHit));
        assert!(state.is_over());
    }

    #[test]
    fn test_chasing_tail_is_safe() {
        let mut state = game(WallMode::Wrap, 1);
        // 2x2 loop: head (5,5), then (6,5), (6,6), tail (5,6)
        state.snake = Snake::new(IVec2::new(5, 6), 1, Direction::Right);
        state.snake.advance_to(IVec2::new(6, 6), true);
        state.snake.advance_to(IVec2::new(6, 5), true);
        state.snake.advance_to(IVec2::new(5, 5), true);
        state.snake.request_direction(Direction::Down);

        assert_eq!(tick(&mut state), Some(Collision::None));
        assert_eq!(state.snake.head(), IVec2::new(5, 6));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_reversal_never_applies() {
        let mut state = game(WallMode::Wrap, 1);
        state.request_direction(Direction::Left);
        tick(&mut state);
        assert_eq!(state.snake.direction(), Direction::Right);
        assert_eq!(state.snake.head(), IVec2::new(9, 8));
    }

    #[test]
    fn test_paused_and_over_do_not_tick() {
        let mut state = game(WallMode::Wrap, 1);
        state.request_pause();
        let before = state.clone();
        assert_eq!(tick(&mut state), None);
        assert_eq!(state, before);

        state.phase = GamePhase::Over;
        assert_eq!(tick(&mut state), None);
    }

    #[test]
    fn test_time_limit_ends_game() {
        let mut p = params(WallMode::Wrap, 3);
        p.time_limit_secs = Some(1);
        let mut state = GameState::with_params(Difficulty::Casual, p, 17, 9);
        park_food(&mut state, IVec2::new(0, 0));

        for _ in 0..9 {
            tick(&mut state);
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_left_ticks, Some(1));

        tick(&mut state);
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_food_lifetime_respawns() {
        let mut p = params(WallMode::Wrap, 1);
        p.food_lifetime_ms = Some(300);
        let mut state = GameState::with_params(Difficulty::Hell, p, 17, 4);
        state.food = Some(Food {
            cell: IVec2::new(0, 0),
            ttl_ticks: Some(3),
        });

        tick(&mut state);
        tick(&mut state);
        assert_eq!(state.food.and_then(|f| f.ttl_ticks), Some(1));

        tick(&mut state);
        let food = state.food.expect("food respawned");
        assert_ne!(food.cell, IVec2::new(0, 0));
        assert_eq!(food.ttl_ticks, Some(3));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_expired_food_stays_when_nowhere_else_is_free() {
        let mut p = params(WallMode::Wrap, 1);
        p.food_lifetime_ms = Some(300);
        let mut state = GameState::with_params(Difficulty::Hell, p, 17, 4);
        let food_cell = IVec2::new(0, 0);
        let next_head = state.snake.next_head(17, WallMode::Wrap);
        let tail = state.snake.tail();
        // Block everything but the food and the next head, the vacating tail included
        state.obstacles = all_cells(17)
            .filter(|&c| c != food_cell && c != next_head)
            .filter(|&c| c == tail || !state.snake.contains(c))
            .collect();
        state.food = Some(Food {
            cell: food_cell,
            ttl_ticks: Some(1),
        });

        assert_eq!(tick(&mut state), Some(Collision::None));
        let food = state.food.expect("food kept");
        assert_eq!(food.cell, food_cell);
        assert_eq!(food.ttl_ticks, Some(3));
        assert!(state.is_running());
    }

    #[test]
    fn test_fresh_food_gets_full_lifetime() {
        let mut p = params(WallMode::Bounded, 2);
        p.food_lifetime_ms = Some(300);
        let full = p.food_lifetime_ticks();
        assert_eq!(full, Some(3));

        // Eaten: the replacement is not aged by the tick that placed it
        let mut state = GameState::with_params(Difficulty::Hell, p, 17, 4);
        state.food = Some(Food {
            cell: IVec2::new(9, 8),
            ttl_ticks: full,
        });
        assert_eq!(tick(&mut state), Some(Collision::Food));
        assert_eq!(state.food.and_then(|f| f.ttl_ticks), full);

        // Expired: same full lifetime
        state.food = Some(Food {
            cell: IVec2::new(0, 0),
            ttl_ticks: Some(1),
        });
        assert_eq!(tick(&mut state), Some(Collision::None));
        assert_eq!(state.score, 1);
        assert_eq!(state.food.and_then(|f| f.ttl_ticks), full);

        // Moved off a respawned body after a lost life
        let mut state = GameState::with_params(Difficulty::Hell, p, 17, 4);
        state.snake = Snake::new(IVec2::new(16, 3), 3, Direction::Right);
        state.food = Some(Food {
            cell: IVec2::new(7, 8),
            ttl_ticks: Some(2),
        });
        assert_eq!(tick(&mut state), Some(Collision::Wall));
        assert_eq!(state.lives, 1);
        assert_eq!(state.food.and_then(|f| f.ttl_ticks), full);
    }

    #[test]
    fn test_untouched_food_still_ages_after_lost_life() {
        let mut p = params(WallMode::Bounded, 2);
        p.food_lifetime_ms = Some(300);
        let mut state = GameState::with_params(Difficulty::Hell, p, 17, 4);
        state.snake = Snake::new(IVec2::new(16, 3), 3, Direction::Right);
        state.food = Some(Food {
            cell: IVec2::new(0, 0),
            ttl_ticks: Some(3),
        });
        tick(&mut state);
        assert_eq!(state.food.and_then(|f| f.ttl_ticks), Some(2));
    }

    #[test]
    fn test_obstacles_spawn_on_cadence_and_cap_grows() {
        let mut p = params(WallMode::Wrap, 1);
        p.initial_obstacle_cap = 1;
        p.obstacle_cap_step = 1;
        p.obstacle_cap_ceiling = 2;
        p.obstacle_interval_ms = Some(200);
        let mut state = GameState::with_params(Difficulty::Hard, p, 17, 2024);
        park_food(&mut state, IVec2::new(0, 0));
        let respawn = spawn_head(17);

        tick(&mut state);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.obstacle_cap, 1);

        // First cadence tick places one and raises the cap
        let head = state.snake.next_head(17, WallMode::Wrap);
        tick(&mut state);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacle_cap, 2);
        assert!(chebyshev(state.obstacles[0], head) > OBSTACLE_HEAD_CLEARANCE);

        for _ in 0..20 {
            state.request_direction(Direction::Up);
            tick(&mut state);
            state.request_direction(Direction::Right);
            tick(&mut state);
            if state.is_over() {
                break;
            }
        }
        assert!((1..=2).contains(&state.obstacles.len()));
        assert_eq!(state.obstacle_cap, 2);

        for &obstacle in &state.obstacles {
            assert!(chebyshev(obstacle, respawn) > OBSTACLE_HEAD_CLEARANCE);
            assert_ne!(Some(obstacle), state.food.map(|f| f.cell));
        }

        let mut seen = state.obstacles.clone();
        seen.sort_by_key(|c| (c.x, c.y));
        seen.dedup();
        assert_eq!(seen.len(), state.obstacles.len());
    }

    #[test]
    fn test_hard_game_gains_obstacles_over_time() {
        let mut state = GameState::new(Difficulty::Hard, 99);
        let every = state.params.obstacle_interval_ticks().expect("hard has a cadence");
        for _ in 0..every {
            if let Some(dir) = crate::sim::autopilot::suggest_direction(&state) {
                state.request_direction(dir);
            }
            tick(&mut state);
        }
        assert!(state.is_running());
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacle_cap, 4);
        assert!(chebyshev(state.obstacles[0], spawn_head(17)) > OBSTACLE_HEAD_CLEARANCE);
    }

    #[test]
    fn test_length_grows_only_when_eating() {
        let mut state = GameState::new(Difficulty::Casual, 31337);
        for step in 0..400 {
            if step % 7 == 0 {
                state.request_direction(Direction::ALL[step % 4]);
            }
            let before = state.snake.len();
            let score = state.score;
            match tick(&mut state) {
                Some(Collision::Food) => {
                    assert_eq!(state.snake.len(), before + 1);
                    assert_eq!(state.score, score + POINTS_PER_FOOD);
                }
                Some(c) if c.is_fatal() => {}
                Some(_) => assert_eq!(state.snake.len(), before),
                None => break,
            }
        }
    }
}
