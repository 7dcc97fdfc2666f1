//! High score leaderboard system
//!
//! The leaderboard is an external collaborator behind the [`Leaderboard`]
//! trait; [`LocalLeaderboard`] keeps the top 10 in a key-value store.
//! Personal bests are tracked separately, one per difficulty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::now_ms;
use crate::platform::storage::{KeyValueStore, StorageError, load_json, save_json};
use crate::tuning::Difficulty;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Longest accepted player name (characters)
pub const MAX_NAME_LEN: usize = 20;

/// Leaderboard failure. The game itself is never affected by these.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("player name is empty")]
    EmptyName,
    #[error("leaderboard storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Persistence collaborator for finished runs
pub trait Leaderboard {
    /// Record a score. Returns the rank achieved (1-indexed), or `None`
    /// if the score did not make the board.
    fn submit(&mut self, name: &str, score: u64) -> Result<Option<usize>, LeaderboardError>;

    /// Best entries, highest score first
    fn top_entries(&self, limit: usize) -> Result<Vec<HighScoreEntry>, LeaderboardError>;
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub player_name: String,
    /// Player's score
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, player_name: String, score: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            player_name,
            score,
            timestamp,
        };

        // Find insertion point (sorted descending by score, ties keep older first)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }
}

/// Trim a player name, rejecting blanks and capping the length
pub fn normalize_name(name: &str) -> Result<String, LeaderboardError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LeaderboardError::EmptyName);
    }
    Ok(name.chars().take(MAX_NAME_LEN).collect())
}

/// Leaderboard kept in a local key-value store
#[derive(Debug)]
pub struct LocalLeaderboard<S> {
    store: S,
}

impl<S: KeyValueStore> LocalLeaderboard<S> {
    const STORAGE_KEY: &'static str = "snake_king_leaderboard";

    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn load(&self) -> Result<HighScores, LeaderboardError> {
        Ok(load_json(&self.store, Self::STORAGE_KEY)?.unwrap_or_default())
    }

    /// Rank `score` would take if submitted now, `None` if it would not place
    pub fn potential_rank(&self, score: u64) -> Result<Option<usize>, LeaderboardError> {
        Ok(self.load()?.potential_rank(score))
    }
}

impl<S: KeyValueStore> Leaderboard for LocalLeaderboard<S> {
    fn submit(&mut self, name: &str, score: u64) -> Result<Option<usize>, LeaderboardError> {
        let name = normalize_name(name)?;
        let mut scores = self.load()?;

        let Some(rank) = scores.add_score(name.clone(), score, now_ms()) else {
            log::info!("Score {} by {} did not make the leaderboard", score, name);
            return Ok(None);
        };

        save_json(&mut self.store, Self::STORAGE_KEY, &scores)?;
        log::info!(
            "{} placed #{} with {} ({} entries)",
            name,
            rank,
            score,
            scores.entries.len()
        );
        Ok(Some(rank))
    }

    fn top_entries(&self, limit: usize) -> Result<Vec<HighScoreEntry>, LeaderboardError> {
        let mut scores = self.load()?;
        scores.entries.truncate(limit);
        Ok(scores.entries)
    }
}

/// Best score per difficulty, kept on this device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalBests {
    scores: BTreeMap<Difficulty, u64>,
}

impl PersonalBests {
    const STORAGE_KEY: &'static str = "snake_king_best_scores";

    /// Load from storage, starting fresh if nothing usable is there
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match load_json(store, Self::STORAGE_KEY) {
            Ok(Some(bests)) => bests,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring stored best scores: {}", e);
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        save_json(store, Self::STORAGE_KEY, self)
    }

    pub fn best(&self, difficulty: Difficulty) -> u64 {
        self.scores.get(&difficulty).copied().unwrap_or(0)
    }

    /// Record a finished run. Returns true if it set a new personal best.
    pub fn record(&mut self, difficulty: Difficulty, score: u64) -> bool {
        if score == 0 || score <= self.best(difficulty) {
            return false;
        }
        self.scores.insert(difficulty, score);
        log::info!("New {} personal best: {}", difficulty, score);
        true
    }
}

/// Format a timestamp as a relative date string
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_secs = (now - timestamp) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i32;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i32;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i32;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
