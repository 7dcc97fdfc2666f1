//! Keyboard mapping
//!
//! Key names follow `KeyboardEvent.key`.

use crate::sim::Direction;
use crate::tuning::Difficulty;

/// What a key press asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Restart,
    /// Let the autopilot drive
    ToggleIdle,
    ToggleMute,
    /// Abandon the current run and start over at this difficulty
    NewGame(Difficulty),
}

pub fn command_for_key(key: &str) -> Option<Command> {
    let command = match key {
        "ArrowUp" | "w" | "W" => Command::Turn(Direction::Up),
        "ArrowDown" | "s" | "S" => Command::Turn(Direction::Down),
        "ArrowLeft" | "a" | "A" => Command::Turn(Direction::Left),
        "ArrowRight" | "d" | "D" => Command::Turn(Direction::Right),
        " " | "Escape" => Command::TogglePause,
        "Enter" => Command::Restart,
        "i" | "I" => Command::ToggleIdle,
        "m" | "M" => Command::ToggleMute,
        "1" => Command::NewGame(Difficulty::Casual),
        "2" => Command::NewGame(Difficulty::Hard),
        "3" => Command::NewGame(Difficulty::Hell),
        "4" => Command::NewGame(Difficulty::Og),
        _ => return None,
    };
    Some(command)
}
