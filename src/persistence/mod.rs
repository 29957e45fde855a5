//! Durable storage for finished sessions and settings
//!
//! Features:
//! - JSON score table with autoincrement ids
//! - Atomic replace on write (tmp → file)
//! - Missing/corrupt table reads as empty

pub mod json_store;

pub use json_store::JsonScoreStore;

/// Errors that can occur while writing scores or settings
#[derive(Debug)]
pub enum PersistenceError {
    /// Standard I/O error
    Io(std::io::Error),
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "IO error: {e}"),
            PersistenceError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e)
    }
}

impl PersistenceError {
    /// True when the backing file simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistenceError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
