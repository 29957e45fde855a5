//! File-backed score table
//!
//! The whole table lives in one JSON document. Writes go to a sibling `.tmp`
//! file first and are then renamed over the table.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::PersistenceError;
use crate::highscores::{ScoreEntry, ScoreRecord, ScoreStore, compare_records};

/// On-disk format version
const TABLE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ScoreTable {
    version: u32,
    next_id: u64,
    rows: Vec<ScoreRecord>,
}

impl ScoreTable {
    fn new() -> Self {
        Self {
            version: TABLE_VERSION,
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

/// Score table stored as JSON at `path`
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<ScoreTable, PersistenceError> {
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn write_table(&self, table: &ScoreTable) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(table)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreStore for JsonScoreStore {
    fn ensure_schema(&mut self) -> Result<(), PersistenceError> {
        if self.path.exists() {
            return Ok(());
        }
        log::info!("Creating score table at {}", self.path.display());
        self.write_table(&ScoreTable::new())
    }

    fn insert(&mut self, entry: ScoreEntry) -> Result<u64, PersistenceError> {
        self.ensure_schema()?;
        let mut table = self.read_table()?;

        let id = table.next_id;
        table.next_id += 1;
        table.rows.push(ScoreRecord::new(id, entry));
        self.write_table(&table)?;

        log::info!("Score saved (id {}, {} rows)", id, table.rows.len());
        Ok(id)
    }

    fn query_top(&self, n: usize) -> Vec<ScoreRecord> {
        match self.read_table() {
            Ok(table) => {
                let mut rows = table.rows;
                rows.sort_by(compare_records);
                rows.truncate(n);
                rows
            }
            Err(e) if e.is_not_found() => {
                log::debug!("No score table at {}", self.path.display());
                Vec::new()
            }
            Err(e) => {
                log::warn!("Score table unreadable, treating as empty: {}", e);
                Vec::new()
            }
        }
    }
}
