//! Domain errors
//!
//! Refusals are ordinary results: the engine returns them before touching
//! any state, so a refused call leaves the match exactly as it was.

use crate::domain::match_state::PendingAction;
use crate::shared::ids::PlayerId;
use thiserror::Error;

/// A scoring operation the match cannot accept in its current state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("match has not started")]
    NotStarted,

    #[error("match has already started")]
    AlreadyStarted,

    #[error("match is already completed")]
    MatchCompleted,

    #[error("operation refused: {0}")]
    Pending(PendingAction),

    #[error("no transition is pending that this operation would satisfy")]
    NothingPending,

    #[error("no team named {0:?}")]
    UnknownTeam(String),

    #[error("player {0} is not in the {1} team")]
    PlayerNotInTeam(PlayerId, &'static str),

    #[error("striker and non-striker must be different players")]
    SameBatters,

    #[error("player {0} is not at the crease")]
    NotAtCrease(PlayerId),

    #[error("player {0} cannot come in to bat")]
    BatterUnavailable(PlayerId),

    #[error("a next batter is required for this wicket")]
    NextBatterRequired,

    #[error("no batter is left to replace a retired hurt player")]
    NoReplacementBatter,

    #[error("player {0} bowled the previous over")]
    ConsecutiveOvers(PlayerId),

    #[error("no {0} is selected")]
    MissingSelection(&'static str),

    #[error("invalid outcome: {0}")]
    InvalidOutcome(String),
}

impl ScoringError {
    /// Label used for the error metric
    pub fn label(&self) -> &'static str {
        match self {
            ScoringError::NotStarted => "not_started",
            ScoringError::AlreadyStarted => "already_started",
            ScoringError::MatchCompleted => "match_completed",
            ScoringError::Pending(_) => "pending",
            ScoringError::NothingPending => "nothing_pending",
            ScoringError::UnknownTeam(_) => "unknown_team",
            ScoringError::PlayerNotInTeam(..) => "player_not_in_team",
            ScoringError::SameBatters => "same_batters",
            ScoringError::NotAtCrease(_) => "not_at_crease",
            ScoringError::BatterUnavailable(_) => "batter_unavailable",
            ScoringError::NextBatterRequired => "next_batter_required",
            ScoringError::NoReplacementBatter => "no_replacement_batter",
            ScoringError::ConsecutiveOvers(_) => "consecutive_overs",
            ScoringError::MissingSelection(_) => "missing_selection",
            ScoringError::InvalidOutcome(_) => "invalid_outcome",
        }
    }
}

/// Why an undo request was a no-op
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndoRefusal {
    #[error("no delivery recorded since the last over or innings boundary")]
    EmptyLog,

    #[error("a wicket cannot be undone")]
    WicketIrreversible,

    #[error("no batters or bowler selected to undo against")]
    NotInPlay,
}
