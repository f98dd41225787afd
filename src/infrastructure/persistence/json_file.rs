//! File-based MatchStore.

use super::{MatchStore, Result};
use crate::domain::Match;
use crate::shared::ids::MatchId;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each match as `match_{id}.json` in one directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save leaves the previous version intact.
pub struct JsonFileMatchStore {
    base_dir: PathBuf,
}

impl JsonFileMatchStore {
    /// Opens the store, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn match_path(&self, id: MatchId) -> PathBuf {
        self.base_dir.join(format!("match_{}.json", id))
    }
}

impl MatchStore for JsonFileMatchStore {
    fn save(&self, state: &Match) -> Result<()> {
        let path = self.match_path(state.id);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(state)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved match[{}] to {}", state.id, path.display());
        Ok(())
    }

    fn load(&self, id: MatchId) -> Result<Option<Match>> {
        let path = self.match_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let state: Match = serde_json::from_slice(&bytes)?;

        tracing::debug!("Loaded match[{}] from {}", id, path.display());
        Ok(Some(state))
    }

    fn delete(&self, id: MatchId) -> Result<()> {
        let path = self.match_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted match[{}]", id);
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<MatchId>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            let id = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|name| name.strip_prefix("match_"))
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(MatchId::parse);
            if let Some(id) = id {
                ids.push(id);
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }

    fn exists(&self, id: MatchId) -> Result<bool> {
        Ok(self.match_path(id).exists())
    }
}
