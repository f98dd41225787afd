//! Application errors

use crate::domain::{ScoringError, ValidationError};
use crate::infrastructure::persistence::StoreError;
use crate::shared::ids::MatchId;
use thiserror::Error;

/// Errors returned by the scoring service and actor
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("invalid match: {0}")]
    Validation(#[from] ValidationError),

    #[error("refused: {0}")]
    Scoring(#[from] ScoringError),

    /// The operation was applied in memory but could not be saved
    #[error("match {id} updated but not saved: {source}")]
    Persistence {
        id: MatchId,
        #[source]
        source: StoreError,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("scoring actor is not running")]
    ActorUnavailable,
}

impl ServiceError {
    /// Label used for the error metric
    pub fn label(&self) -> &'static str {
        match self {
            ServiceError::MatchNotFound(_) => "match_not_found",
            ServiceError::Validation(_) => "validation",
            ServiceError::Scoring(e) => e.label(),
            ServiceError::Persistence { .. } => "persistence",
            ServiceError::Store(_) => "store",
            ServiceError::ActorUnavailable => "actor_unavailable",
        }
    }
}
