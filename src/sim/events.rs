//! Named events derived by diffing two snapshots
//!
//! Audio and UI react to these instead of hooking into the tick.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};

/// Something noteworthy that happened between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Committed direction changed
    Move,
    /// Food consumed
    Eat,
    /// A life was lost, or the run ended
    Die,
    Pause,
    Resume,
    /// Food timed out and moved elsewhere
    FoodExpired,
    ObstacleSpawned,
    GameOver,
}

/// Events implied by going from `prev` to `next`
pub fn diff(prev: &GameState, next: &GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match (prev.phase, next.phase) {
        (GamePhase::Running, GamePhase::Paused) => events.push(GameEvent::Pause),
        (GamePhase::Paused, GamePhase::Running) => events.push(GameEvent::Resume),
        _ => {}
    }

    // A restart is a new run, not a continuation
    if prev.phase == GamePhase::Over && next.phase != GamePhase::Over {
        return events;
    }

    // A lost life resets heading and may move the food; neither is news
    let lost_life = next.lives < prev.lives;

    if !lost_life && next.snake.direction() != prev.snake.direction() {
        events.push(GameEvent::Move);
    }

    let ate = next.score > prev.score;
    if ate {
        events.push(GameEvent::Eat);
    } else if let (Some(a), Some(b)) = (prev.food, next.food) {
        if a.cell != b.cell && !lost_life {
            events.push(GameEvent::FoodExpired);
        }
    }

    if next.obstacles.len() > prev.obstacles.len() {
        events.push(GameEvent::ObstacleSpawned);
    }

    let became_over = next.is_over() && !prev.is_over();
    if lost_life || became_over {
        events.push(GameEvent::Die);
    }
    if became_over {
        events.push(GameEvent::GameOver);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;
    use crate::sim::snake::{Direction, Snake};
    use crate::sim::state::Food;
    use crate::sim::tick::tick;
    use crate::tuning::Difficulty;
    use glam::IVec2;

    fn game() -> GameState {
        let mut state = GameState::new(Difficulty::Og, 8);
        state.food = Some(Food {
            cell: IVec2::new(0, 0),
            ttl_ticks: None,
        });
        state
    }

    fn step(state: &mut GameState) -> Vec<GameEvent> {
        let prev = state.snapshot();
        tick(state);
        diff(&prev, state)
    }

    #[test]
    fn test_quiet_tick_has_no_events() {
        let mut state = game();
        assert!(step(&mut state).is_empty());
    }

    #[test]
    fn test_turn_emits_move() {
        let mut state = game();
        state.request_direction(Direction::Up);
        assert_eq!(step(&mut state), vec![GameEvent::Move]);
    }

    #[test]
    fn test_eat() {
        let mut state = game();
        let ahead: Cell = IVec2::new(9, 8);
        state.food = Some(Food {
            cell: ahead,
            ttl_ticks: None,
        });
        assert_eq!(step(&mut state), vec![GameEvent::Eat]);
    }

    #[test]
    fn test_wall_death() {
        let mut state = game();
        state.snake = Snake::new(IVec2::new(16, 8), 3, Direction::Right);
        assert_eq!(step(&mut state), vec![GameEvent::Die, GameEvent::GameOver]);
    }

    #[test]
    fn test_lost_life_is_only_die() {
        let mut state = game();
        state.lives = 2;
        state.snake = Snake::new(IVec2::new(5, 0), 3, Direction::Up);
        // Respawned body will cover the food
        state.food = Some(Food {
            cell: IVec2::new(7, 8),
            ttl_ticks: None,
        });
        assert_eq!(step(&mut state), vec![GameEvent::Die]);
        assert_eq!(state.lives, 1);
        assert!(state.is_running());
        assert_ne!(state.food.map(|f| f.cell), Some(IVec2::new(7, 8)));
    }

    #[test]
    fn test_food_expired() {
        let mut state = GameState::new(Difficulty::Hell, 8);
        state.food = Some(Food {
            cell: IVec2::new(0, 0),
            ttl_ticks: Some(1),
        });
        assert_eq!(step(&mut state), vec![GameEvent::FoodExpired]);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_obstacle_spawned() {
        let mut state = GameState::new(Difficulty::Hard, 8);
        state.food = Some(Food {
            cell: IVec2::new(0, 0),
            ttl_ticks: None,
        });
        let every = state.params.obstacle_interval_ticks().expect("hard has a cadence");
        // Straight right on a wrapping board never collides
        for _ in 1..every {
            assert!(step(&mut state).is_empty());
        }
        assert_eq!(step(&mut state), vec![GameEvent::ObstacleSpawned]);
    }

    #[test]
    fn test_time_up_keeps_lives() {
        let mut state = game();
        state.time_left_ticks = Some(1);
        assert_eq!(step(&mut state), vec![GameEvent::Die, GameEvent::GameOver]);
        assert_eq!(state.lives, 1);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut state = game();
        let prev = state.snapshot();
        state.request_pause();
        assert_eq!(diff(&prev, &state), vec![GameEvent::Pause]);

        let prev = state.snapshot();
        state.request_resume();
        assert_eq!(diff(&prev, &state), vec![GameEvent::Resume]);
    }

    #[test]
    fn test_restart_is_silent() {
        let mut state = game();
        state.phase = GamePhase::Over;
        let prev = state.snapshot();
        state.request_restart();
        assert!(diff(&prev, &state).is_empty());
    }
}
