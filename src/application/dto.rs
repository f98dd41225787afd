//! Commands and replies exchanged with the scoring actor

use crate::domain::{Delivery, DeliveryResult, Match, MatchSetup, Outcome, Scorecard, UndoRefusal};
use crate::shared::ids::{MatchId, PlayerId};
use serde::{Deserialize, Serialize};

/// One scoring operation, addressed to a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ScoringCommand {
    CreateMatch {
        setup: MatchSetup,
    },
    StartMatch {
        match_id: MatchId,
        batting_first: String,
        striker: PlayerId,
        non_striker: PlayerId,
        bowler: PlayerId,
    },
    RecordDelivery {
        match_id: MatchId,
        outcome: Outcome,
    },
    UndoLastDelivery {
        match_id: MatchId,
    },
    ChangeBowler {
        match_id: MatchId,
        bowler: PlayerId,
    },
    SwitchInnings {
        match_id: MatchId,
        striker: PlayerId,
        non_striker: PlayerId,
        bowler: PlayerId,
    },
    CompleteMatch {
        match_id: MatchId,
    },
    DeleteMatch {
        match_id: MatchId,
    },
    /// Re-reads the match from the store
    LoadMatch {
        match_id: MatchId,
    },
    GetMatch {
        match_id: MatchId,
    },
    Scorecard {
        match_id: MatchId,
    },
    ListMatches,
}

impl ScoringCommand {
    /// Short label used in logs
    pub fn name(&self) -> &'static str {
        match self {
            ScoringCommand::CreateMatch { .. } => "create_match",
            ScoringCommand::StartMatch { .. } => "start_match",
            ScoringCommand::RecordDelivery { .. } => "record_delivery",
            ScoringCommand::UndoLastDelivery { .. } => "undo_last_delivery",
            ScoringCommand::ChangeBowler { .. } => "change_bowler",
            ScoringCommand::SwitchInnings { .. } => "switch_innings",
            ScoringCommand::CompleteMatch { .. } => "complete_match",
            ScoringCommand::DeleteMatch { .. } => "delete_match",
            ScoringCommand::LoadMatch { .. } => "load_match",
            ScoringCommand::GetMatch { .. } => "get_match",
            ScoringCommand::Scorecard { .. } => "scorecard",
            ScoringCommand::ListMatches => "list_matches",
        }
    }
}

/// Result of an undo request; a refusal is a no-op, not an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    Undone(Delivery),
    Refused(UndoRefusal),
}

impl UndoOutcome {
    pub fn is_undone(&self) -> bool {
        matches!(self, UndoOutcome::Undone(_))
    }
}

/// Reply to a `ScoringCommand`
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringReply {
    Created(MatchId),
    Done,
    Delivery(DeliveryResult),
    Undo(UndoOutcome),
    Completed(String),
    Match(Box<Match>),
    Scorecard(Box<Scorecard>),
    Matches(Vec<MatchId>),
}
