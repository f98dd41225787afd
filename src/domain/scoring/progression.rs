//! Over and innings progression
//!
//! Runs after the delivery has been applied: ends the over, the innings or
//! the match, and owns the selection steps that clear those pending states.

use super::ledger::ScoreDelta;
use super::DeliveryResult;
use crate::domain::errors::ScoringError;
use crate::domain::match_state::{Match, PendingAction, TeamSide, BALLS_PER_OVER};
use crate::shared::ids::PlayerId;
use tracing::debug;

fn innings_over(state: &Match, legal: u32, wickets_lost: u32, runs: u32) -> bool {
    if legal >= state.deliveries_per_innings() || wickets_lost + 1 >= state.team_size {
        return true;
    }
    state.first_innings_finished && state.bowling_team().is_some_and(|t| runs > t.runs)
}

/// Whether the innings ends once `delta` and `wickets` are applied
pub fn innings_would_end(state: &Match, delta: &ScoreDelta, wickets: u32) -> bool {
    let Some(batting) = state.batting_team() else {
        return false;
    };
    innings_over(
        state,
        state.deliveries_bowled_that_count + u32::from(delta.legal),
        batting.wickets_lost + wickets,
        batting.runs + delta.team_runs,
    )
}

/// Post-delivery bookkeeping: innings end first, then over end
pub fn after_delivery(state: &mut Match, legal: bool) -> DeliveryResult {
    let ended = state
        .batting_team()
        .is_some_and(|t| innings_over(state, state.deliveries_bowled_that_count, t.wickets_lost, t.runs));

    if ended {
        state.clear_over();
        state.bowler_has_not_started_over = true;
        let match_completed = state.first_innings_finished;
        state.pending = Some(if match_completed {
            PendingAction::CompleteMatch
        } else {
            PendingAction::SwitchInnings
        });
        debug!(
            legal_deliveries = state.deliveries_bowled_that_count,
            match_completed, "innings completed"
        );
        return DeliveryResult {
            over_completed: false,
            innings_completed: true,
            match_completed,
        };
    }

    let count = state.deliveries_bowled_that_count;
    if count > 0 && count % BALLS_PER_OVER == 0 && !state.bowler_has_not_started_over {
        state.rotate_strike();
        state.clear_over();
        state.previous_bowler = state.bowler.take();
        state.bowler_has_not_started_over = true;
        state.pending = Some(PendingAction::SelectBowler);
        debug!(overs = count / BALLS_PER_OVER, "over completed");
        return DeliveryResult {
            over_completed: true,
            ..DeliveryResult::default()
        };
    }

    if legal {
        state.bowler_has_not_started_over = false;
    }
    DeliveryResult::default()
}

fn expect_pending(state: &Match, wanted: PendingAction) -> Result<(), ScoringError> {
    if !state.started {
        return Err(ScoringError::NotStarted);
    }
    if state.completed {
        return Err(ScoringError::MatchCompleted);
    }
    match state.pending {
        Some(pending) if pending == wanted => Ok(()),
        Some(pending) => Err(ScoringError::Pending(pending)),
        None => Err(ScoringError::NothingPending),
    }
}

/// Checks an opening pair and bowler against the two sides
fn check_lineup(
    state: &Match,
    batting: TeamSide,
    striker: PlayerId,
    non_striker: PlayerId,
    bowler: PlayerId,
) -> Result<(), ScoringError> {
    if striker == non_striker {
        return Err(ScoringError::SameBatters);
    }
    let batting_team = state.team(batting);
    for id in [striker, non_striker] {
        if !batting_team.contains(id) {
            return Err(ScoringError::PlayerNotInTeam(id, "batting"));
        }
    }
    if !state.team(batting.other()).contains(bowler) {
        return Err(ScoringError::PlayerNotInTeam(bowler, "bowling"));
    }
    Ok(())
}

/// Puts the opening pair and bowler in place for a fresh innings
fn open_innings(state: &mut Match, batting: TeamSide, striker: PlayerId, non_striker: PlayerId, bowler: PlayerId) {
    state.current_batting = Some(batting);
    state.current_bowling = Some(batting.other());
    state.striker = Some(striker);
    state.non_striker = Some(non_striker);
    state.bowler = Some(bowler);
    state.previous_bowler = None;

    let team = state.team_mut(batting);
    for (id, position) in [(striker, 1), (non_striker, 2)] {
        if let Some(player) = team.player_mut(id) {
            player.batting_position = position;
        }
    }
    if let Some(player) = state.team_mut(batting.other()).player_mut(bowler) {
        player.bowling_position = 1;
    }

    state.num_different_bowlers = 1;
    state.batters_sent_in = 2;
    state.deliveries_bowled_that_count = 0;
    state.bowler_has_not_started_over = true;
    state.clear_over();
    state.pending = None;
}

pub fn start(
    state: &mut Match,
    batting_first: &str,
    striker: PlayerId,
    non_striker: PlayerId,
    bowler: PlayerId,
) -> Result<(), ScoringError> {
    if state.started {
        return Err(ScoringError::AlreadyStarted);
    }
    let side = state
        .side_named(batting_first)
        .ok_or_else(|| ScoringError::UnknownTeam(batting_first.to_string()))?;
    check_lineup(state, side, striker, non_striker, bowler)?;

    state.batting_first = Some(side);
    open_innings(state, side, striker, non_striker, bowler);
    state.started = true;
    Ok(())
}

pub fn change_bowler(state: &mut Match, bowler: PlayerId) -> Result<(), ScoringError> {
    expect_pending(state, PendingAction::SelectBowler)?;
    if state.previous_bowler == Some(bowler) {
        return Err(ScoringError::ConsecutiveOvers(bowler));
    }

    let next_position = state.num_different_bowlers + 1;
    let player = state
        .bowling_team_mut()
        .and_then(|t| t.player_mut(bowler))
        .ok_or(ScoringError::PlayerNotInTeam(bowler, "bowling"))?;
    let first_spell = !player.has_bowled();
    if first_spell {
        player.bowling_position = next_position;
        state.num_different_bowlers = next_position;
    }

    state.bowler = Some(bowler);
    state.pending = None;
    Ok(())
}

pub fn switch_innings(
    state: &mut Match,
    striker: PlayerId,
    non_striker: PlayerId,
    bowler: PlayerId,
) -> Result<(), ScoringError> {
    expect_pending(state, PendingAction::SwitchInnings)?;
    let batting = state
        .current_bowling
        .ok_or(ScoringError::MissingSelection("bowling team"))?;
    check_lineup(state, batting, striker, non_striker, bowler)?;

    state.first_innings_deliveries_bowled_that_count = state.deliveries_bowled_that_count;
    state.first_innings_finished = true;
    open_innings(state, batting, striker, non_striker, bowler);
    Ok(())
}

pub fn complete(state: &mut Match) -> Result<String, ScoringError> {
    expect_pending(state, PendingAction::CompleteMatch)?;
    state.result = result_text(state);
    state.completed = true;
    state.pending = None;
    state.clear_over();
    Ok(state.result.clone())
}

fn plural(n: u32, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// Result line comparing the two totals
pub fn result_text(state: &Match) -> String {
    let Some(first_side) = state.batting_first else {
        return String::new();
    };
    let first = state.team(first_side);
    let second = state.team(first_side.other());

    if first.runs > second.runs {
        format!("{} won by {}!", first.name, plural(first.runs - second.runs, "run"))
    } else if second.runs > first.runs {
        let remaining = state
            .team_size
            .saturating_sub(1)
            .saturating_sub(second.wickets_lost);
        format!("{} won by {}!", second.name, plural(remaining, "wicket"))
    } else {
        "Match tied!".to_string()
    }
}
