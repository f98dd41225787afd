//! In-memory MatchStore for tests and dry runs.

use super::{MatchStore, Result};
use crate::domain::Match;
use crate::shared::ids::MatchId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Keeps saved matches in a map behind a lock.
#[derive(Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<MatchId, Match>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.read().is_empty()
    }
}

impl MatchStore for InMemoryMatchStore {
    fn save(&self, state: &Match) -> Result<()> {
        self.matches.write().insert(state.id, state.clone());
        Ok(())
    }

    fn load(&self, id: MatchId) -> Result<Option<Match>> {
        Ok(self.matches.read().get(&id).cloned())
    }

    fn delete(&self, id: MatchId) -> Result<()> {
        self.matches.write().remove(&id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<MatchId>> {
        let mut ids: Vec<MatchId> = self.matches.read().keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn exists(&self, id: MatchId) -> Result<bool> {
        Ok(self.matches.read().contains_key(&id))
    }
}
