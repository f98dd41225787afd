//! Single-step undo within the current over

use super::ledger::ScoreDelta;
use crate::domain::entities::Delivery;
use crate::domain::errors::UndoRefusal;
use crate::domain::match_state::{Match, BALLS_PER_OVER};

/// Reverts the most recent delivery of the current over
pub fn undo_last(state: &mut Match) -> Result<Delivery, UndoRefusal> {
    let last = state.current_over.last().ok_or(UndoRefusal::EmptyLog)?;
    if last.outcome.is_wicket() {
        return Err(UndoRefusal::WicketIrreversible);
    }
    if state.striker.is_none() || state.non_striker.is_none() || state.bowler.is_none() {
        return Err(UndoRefusal::NotInPlay);
    }

    let delta = last
        .outcome
        .to_outcome(last.has_bat_runs_marker())
        .as_ref()
        .and_then(ScoreDelta::for_outcome)
        .ok_or(UndoRefusal::WicketIrreversible)?;

    // strike first, so the runs come off the batter who scored them
    if delta.odd_running() {
        state.rotate_strike();
    }
    delta.revert(state);

    let removed = state.current_over.pop().ok_or(UndoRefusal::EmptyLog)?;
    state.deliveries_bowled = state.deliveries_bowled.saturating_sub(1);
    state.bowler_has_not_started_over = state.deliveries_bowled_that_count % BALLS_PER_OVER == 0;
    Ok(removed)
}
