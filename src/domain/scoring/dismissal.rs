//! Dismissals
//!
//! Validation runs against the untouched match; `apply` assumes it passed.

use super::ledger::ScoreDelta;
use crate::domain::entities::{NOT_OUT, RETIRED_HURT};
use crate::domain::errors::ScoringError;
use crate::domain::match_state::Match;
use crate::domain::outcome::{Dismissal, DismissalMode};
use crate::shared::ids::PlayerId;
use tracing::debug;

/// Runs and ball accounting of the dismissal ball
pub fn score_delta(mode: &DismissalMode) -> ScoreDelta {
    match mode {
        DismissalMode::Bowled | DismissalMode::Lbw | DismissalMode::Caught { .. } => {
            ScoreDelta::dead_ball(true)
        }
        DismissalMode::Stumped { on_wide, .. } | DismissalMode::HitWicket { on_wide } => {
            if *on_wide {
                ScoreDelta::wide(0)
            } else {
                ScoreDelta::dead_ball(true)
            }
        }
        DismissalMode::RunOut {
            runs_completed, ball, ..
        } => ScoreDelta::run_out(*runs_completed, *ball),
        DismissalMode::RetiredOut { .. } | DismissalMode::RetiredHurt { .. } => ScoreDelta::default(),
    }
}

/// Whether the batters swap ends before the replacement walks in
pub fn rotates_strike(mode: &DismissalMode) -> bool {
    match mode {
        DismissalMode::Caught { crossed_over, .. } => *crossed_over,
        DismissalMode::RunOut {
            runs_completed,
            crossed_over,
            ..
        } => (runs_completed % 2 == 1) ^ crossed_over,
        _ => false,
    }
}

/// Checks every player the dismissal names
pub fn validate(state: &Match, dismissal: &Dismissal, ends_innings: bool) -> Result<(), ScoringError> {
    let batting = state
        .batting_team()
        .ok_or(ScoringError::MissingSelection("batting team"))?;
    let bowling = state
        .bowling_team()
        .ok_or(ScoringError::MissingSelection("bowling team"))?;
    let mode = &dismissal.mode;

    if let Some(fielder) = mode.fielder() {
        if !bowling.contains(fielder) {
            return Err(ScoringError::PlayerNotInTeam(fielder, "bowling"));
        }
    }

    if let Some(batter) = mode.named_batter() {
        if !state.is_at_crease(batter) {
            return Err(ScoringError::NotAtCrease(batter));
        }
    }

    if matches!(mode, DismissalMode::RetiredHurt { .. }) && batting.wickets_lost + 2 >= state.team_size {
        return Err(ScoringError::NoReplacementBatter);
    }

    if ends_innings {
        return Ok(());
    }

    let next = dismissal.next_batter.ok_or(ScoringError::NextBatterRequired)?;
    let player = batting
        .player(next)
        .ok_or(ScoringError::PlayerNotInTeam(next, "batting"))?;
    if state.is_at_crease(next) || !player.can_come_in() {
        return Err(ScoringError::BatterUnavailable(next));
    }

    Ok(())
}

/// Records the wicket and sends in the replacement
pub fn apply(state: &mut Match, dismissal: &Dismissal, ends_innings: bool) {
    let mode = &dismissal.mode;
    let dismissed = match mode.named_batter().or(state.striker) {
        Some(id) => id,
        None => return,
    };

    score_delta(mode).apply(state);

    let description = describe(state, mode);
    let bowler = state.bowler;
    if let Some((batting, bowling)) = state.sides_mut() {
        batting.wickets_lost += 1;
        if let Some(player) = batting.player_mut(dismissed) {
            player.out_description = description;
        }
        if mode.credits_bowler() {
            if let Some(player) = bowler.and_then(|id| bowling.player_mut(id)) {
                player.bowling.wickets += 1;
            }
        }
    }

    if rotates_strike(mode) {
        state.rotate_strike();
    }

    let incoming = if ends_innings {
        None
    } else {
        dismissal.next_batter
    };
    if let Some(next) = incoming {
        send_in(state, next);
    }

    if state.striker == Some(dismissed) {
        state.striker = incoming;
    } else if state.non_striker == Some(dismissed) {
        state.non_striker = incoming;
    }

    debug!(
        mode = mode.label(),
        dismissed = %dismissed,
        incoming = ?incoming,
        "wicket recorded"
    );
}

fn send_in(state: &mut Match, next: PlayerId) {
    let mut first_entry = false;
    if let Some(batting) = state.batting_team_mut() {
        let returning = batting.player(next).is_some_and(|p| p.is_retired_hurt());
        if returning {
            batting.wickets_lost = batting.wickets_lost.saturating_sub(1);
        }
        if let Some(player) = batting.player_mut(next) {
            if returning {
                player.out_description = NOT_OUT.to_string();
            } else {
                first_entry = true;
            }
        }
    }

    if first_entry {
        state.batters_sent_in += 1;
        let position = state.batters_sent_in;
        if let Some(player) = state.batting_team_mut().and_then(|t| t.player_mut(next)) {
            player.batting_position = position;
        }
    }
}

fn describe(state: &Match, mode: &DismissalMode) -> String {
    let name = |id: Option<PlayerId>| {
        id.and_then(|id| state.player(id))
            .map(|p| p.name.clone())
            .unwrap_or_default()
    };
    let bowler = name(state.bowler);

    match mode {
        DismissalMode::Bowled => format!("b {}", bowler),
        DismissalMode::Lbw => format!("lbw b {}", bowler),
        DismissalMode::Caught { fielder, .. } => format!("c {} b {}", name(Some(*fielder)), bowler),
        DismissalMode::Stumped { fielder, .. } => format!("st {} b {}", name(Some(*fielder)), bowler),
        DismissalMode::HitWicket { .. } => format!("hit wicket b {}", bowler),
        DismissalMode::RunOut { fielder, .. } => format!("run out ({})", name(Some(*fielder))),
        DismissalMode::RetiredOut { .. } => "retired out".to_string(),
        DismissalMode::RetiredHurt { .. } => RETIRED_HURT.to_string(),
    }
}
