//! Match persistence
//!
//! The scoring service owns a `MatchStore` and saves the whole match after
//! every mutating operation. Two stores ship with the crate:
//! - `InMemoryMatchStore`: tests and dry runs
//! - `JsonFileMatchStore`: one JSON document per match on disk

mod json_file;
mod memory;

pub use json_file::JsonFileMatchStore;
pub use memory::InMemoryMatchStore;

use crate::domain::Match;
use crate::shared::ids::MatchId;
use thiserror::Error;

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable storage of whole matches, keyed by id
pub trait MatchStore: Send + Sync {
    /// Saves (or overwrites) a match
    fn save(&self, state: &Match) -> Result<()>;

    /// Loads a match, `None` if it was never saved
    fn load(&self, id: MatchId) -> Result<Option<Match>>;

    /// Removes a match; deleting an unknown id is not an error
    fn delete(&self, id: MatchId) -> Result<()>;

    /// Ids of every stored match
    fn list(&self) -> Result<Vec<MatchId>>;

    fn exists(&self, id: MatchId) -> Result<bool> {
        Ok(self.load(id)?.is_some())
    }
}
