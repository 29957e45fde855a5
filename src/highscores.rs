//! High score leaderboard system
//!
//! Finished sessions are appended to a score table through [`ScoreStore`] and
//! read back best-first: accuracy, then score.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::persistence::PersistenceError;

/// Number of rows shown on the leaderboard
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished session, ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u32,
    /// `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    pub shots: u32,
    pub hits: u32,
    /// hits / shots, 0 when nothing was fired
    pub accuracy: f64,
}

/// A stored row (never modified after insertion)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: u64,
    pub score: u32,
    pub date: String,
    pub shots: u32,
    pub hits: u32,
    pub accuracy: f64,
}

impl ScoreRecord {
    pub fn new(id: u64, entry: ScoreEntry) -> Self {
        Self {
            id,
            score: entry.score,
            date: entry.date,
            shots: entry.shots,
            hits: entry.hits,
            accuracy: entry.accuracy,
        }
    }
}

/// Leaderboard order: accuracy desc, score desc, then insertion order
pub fn compare_records(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    b.accuracy
        .total_cmp(&a.accuracy)
        .then(b.score.cmp(&a.score))
        .then(a.id.cmp(&b.id))
}

/// Append-only score table
pub trait ScoreStore {
    /// Create the backing table if it does not exist yet
    fn ensure_schema(&mut self) -> Result<(), PersistenceError>;

    /// Append a row, returning its id
    fn insert(&mut self, entry: ScoreEntry) -> Result<u64, PersistenceError>;

    /// Best `n` rows. A missing or unreadable table reads as empty.
    fn query_top(&self, n: usize) -> Vec<ScoreRecord>;
}

/// In-memory score table
#[derive(Debug, Clone)]
pub struct MemoryScoreStore {
    pub rows: Vec<ScoreRecord>,
    next_id: u64,
}

impl Default for MemoryScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn ensure_schema(&mut self) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn insert(&mut self, entry: ScoreEntry) -> Result<u64, PersistenceError> {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push(ScoreRecord::new(id, entry));
        Ok(id)
    }

    fn query_top(&self, n: usize) -> Vec<ScoreRecord> {
        let mut rows = self.rows.clone();
        rows.sort_by(compare_records);
        rows.truncate(n);
        rows
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<ScoreRecord>,
}

impl HighScores {
    /// Read the top rows from `store`
    pub fn load<S: ScoreStore + ?Sized>(store: &S) -> Self {
        let entries = store.query_top(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", entries.len());
        Self { entries }
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best row (if any)
    pub fn top(&self) -> Option<&ScoreRecord> {
        self.entries.first()
    }

    /// Text shown on the high score screen
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "No scores available.".to_string();
        }

        let mut text = String::from("High Scores:\n\n");
        for (i, e) in self.entries.iter().enumerate() {
            text.push_str(&format!(
                "{}. Score: {}, Date: {}, Shots: {}, Hits: {}, Accuracy: {:.2}\n",
                i + 1,
                e.score,
                e.date,
                e.shots,
                e.hits,
                e.accuracy
            ));
        }
        text
    }
}
