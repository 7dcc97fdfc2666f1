//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock for leaderboard timestamps and seeds)
//! - Input events (key names to game commands)
//! - Storage (LocalStorage on web, in-memory natively)

pub mod input;
pub mod storage;

pub use input::{Command, command_for_key};
pub use storage::{KeyValueStore, MemoryStore, StorageError};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// A run seed derived from the clock
pub fn clock_seed() -> u64 {
    now_ms() as u64
}
