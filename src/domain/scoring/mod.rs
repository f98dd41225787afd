//! Scoring Engine
//!
//! Borrows a match mutably for the duration of one operation. Every
//! operation validates first and mutates after, so a refused call leaves the
//! match untouched.
//!
//! ## Flow of `record`
//! 1. Check the match is in play and the outcome is well formed
//! 2. Project whether the innings ends (decides if a next batter is needed)
//! 3. Apply the score delta or the dismissal, rotate strike at most once
//! 4. Append the delivery to the current-over log
//! 5. Hand over to progression for over/innings/match transitions

pub mod dismissal;
pub mod ledger;
pub mod progression;
pub mod undo;

use crate::domain::entities::Delivery;
use crate::domain::errors::{ScoringError, UndoRefusal};
use crate::domain::match_state::Match;
use crate::domain::outcome::Outcome;
use crate::shared::ids::PlayerId;
use ledger::ScoreDelta;
use serde::{Deserialize, Serialize};

/// Transition flags the caller inspects before the next delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub over_completed: bool,
    pub innings_completed: bool,
    pub match_completed: bool,
}

/// Applies scoring operations to one match
pub struct ScoringEngine<'a> {
    state: &'a mut Match,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(state: &'a mut Match) -> Self {
        Self { state }
    }

    /// Assigns roles for the first innings
    pub fn start(
        &mut self,
        batting_first: &str,
        striker: PlayerId,
        non_striker: PlayerId,
        bowler: PlayerId,
    ) -> Result<(), ScoringError> {
        progression::start(self.state, batting_first, striker, non_striker, bowler)
    }

    /// Records one delivery
    pub fn record(&mut self, outcome: &Outcome) -> Result<DeliveryResult, ScoringError> {
        self.ensure_in_play()?;
        outcome.check_ranges().map_err(ScoringError::InvalidOutcome)?;

        let legal = outcome.is_legal();
        let code = outcome.code();
        let mut bat_runs_marker = false;

        match outcome {
            Outcome::Wicket(dismissal) => {
                let delta = dismissal::score_delta(&dismissal.mode);
                let ends_innings = progression::innings_would_end(self.state, &delta, 1);
                dismissal::validate(self.state, dismissal, ends_innings)?;
                dismissal::apply(self.state, dismissal, ends_innings);
            }
            other => {
                let delta = ScoreDelta::for_outcome(other)
                    .ok_or_else(|| ScoringError::InvalidOutcome(other.kind().to_string()))?;
                delta.apply(self.state);
                if delta.odd_running() {
                    self.state.rotate_strike();
                }
                bat_runs_marker = other.runs_off_bat_on_no_ball();
            }
        }

        let index = self.state.deliveries_bowled;
        self.state
            .push_delivery(Delivery::new(index, code, bat_runs_marker));

        Ok(progression::after_delivery(self.state, legal))
    }

    /// Reverts the last delivery of the current over
    pub fn undo(&mut self) -> Result<Delivery, UndoRefusal> {
        undo::undo_last(self.state)
    }

    /// Supplies the bowler for the next over
    pub fn change_bowler(&mut self, bowler: PlayerId) -> Result<(), ScoringError> {
        progression::change_bowler(self.state, bowler)
    }

    pub fn switch_innings(
        &mut self,
        striker: PlayerId,
        non_striker: PlayerId,
        bowler: PlayerId,
    ) -> Result<(), ScoringError> {
        progression::switch_innings(self.state, striker, non_striker, bowler)
    }

    /// Confirms the result once the second innings is over
    pub fn complete(&mut self) -> Result<String, ScoringError> {
        progression::complete(self.state)
    }

    fn ensure_in_play(&self) -> Result<(), ScoringError> {
        let state = &*self.state;
        if !state.started {
            return Err(ScoringError::NotStarted);
        }
        if state.completed {
            return Err(ScoringError::MatchCompleted);
        }
        if let Some(pending) = state.pending {
            return Err(ScoringError::Pending(pending));
        }
        if state.striker.is_none() || state.non_striker.is_none() {
            return Err(ScoringError::MissingSelection("batter"));
        }
        if state.bowler.is_none() {
            return Err(ScoringError::MissingSelection("bowler"));
        }
        Ok(())
    }
}
