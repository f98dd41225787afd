//! Scorecard
//!
//! Read-only figures derived from a match: team lines, batting and bowling
//! rows, the chase state during the second innings.

use crate::domain::entities::Team;
use crate::domain::match_state::{Match, PendingAction, TeamSide, BALLS_PER_OVER};
use crate::shared::ids::{MatchId, PlayerId};
use serde::Serialize;
use std::fmt;

/// `O.B` notation of a ball count
pub fn overs_notation(balls: u32) -> String {
    format!("{}.{}", balls / BALLS_PER_OVER, balls % BALLS_PER_OVER)
}

/// Runs per hundred balls, one decimal
pub fn strike_rate(runs: u32, balls: u32) -> String {
    if balls == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", f64::from(runs) / f64::from(balls) * 100.0)
}

/// Runs per six legal balls, two decimals
pub fn economy(runs: u32, balls: u32) -> String {
    if balls == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", f64::from(runs) / (f64::from(balls) / f64::from(BALLS_PER_OVER)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingRow {
    pub name: String,
    pub dismissal: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: String,
    pub on_strike: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlingRow {
    pub name: String,
    pub overs: String,
    pub runs: u32,
    pub wickets: u32,
    pub extras: u32,
    pub economy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InningsCard {
    pub batting_team: String,
    pub bowling_team: String,
    pub runs: u32,
    pub wickets: u32,
    pub extras: u32,
    pub overs: String,
    pub batting: Vec<BattingRow>,
    pub bowling: Vec<BowlingRow>,
}

/// What the side batting second still needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChaseState {
    pub target: u32,
    pub runs_required: u32,
    pub balls_remaining: u32,
    pub required_run_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    pub match_id: MatchId,
    pub headline: String,
    pub innings: Vec<InningsCard>,
    pub chase: Option<ChaseState>,
    /// Codes of the current over's deliveries
    pub this_over: Vec<String>,
    pub pending: Option<PendingAction>,
    pub result: Option<String>,
}

impl Scorecard {
    pub fn from_match(state: &Match) -> Self {
        let mut innings = Vec::new();
        if let Some(first) = state.batting_first {
            let balls = if state.first_innings_finished {
                state.first_innings_deliveries_bowled_that_count
            } else {
                state.deliveries_bowled_that_count
            };
            innings.push(innings_card(state, first, balls));
            if state.first_innings_finished {
                innings.push(innings_card(state, first.other(), state.deliveries_bowled_that_count));
            }
        }

        Self {
            match_id: state.id,
            headline: headline(state),
            innings,
            chase: chase_state(state),
            this_over: state.current_over.iter().map(|d| d.outcome.to_string()).collect(),
            pending: state.pending,
            result: state.completed.then(|| state.result.clone()),
        }
    }
}

fn innings_card(state: &Match, batting_side: TeamSide, balls: u32) -> InningsCard {
    let batting = state.team(batting_side);
    let bowling = state.team(batting_side.other());
    let in_play = state.current_batting == Some(batting_side) && !state.completed;

    InningsCard {
        batting_team: batting.name.clone(),
        bowling_team: bowling.name.clone(),
        runs: batting.runs,
        wickets: batting.wickets_lost,
        extras: batting.extras,
        overs: overs_notation(balls),
        batting: batting_rows(batting, in_play.then_some(state.striker).flatten()),
        bowling: bowling_rows(bowling),
    }
}

fn batting_rows(team: &Team, striker: Option<PlayerId>) -> Vec<BattingRow> {
    let mut players: Vec<_> = team.players.iter().filter(|p| p.has_batted()).collect();
    players.sort_by_key(|p| p.batting_position);
    players
        .into_iter()
        .map(|p| BattingRow {
            name: p.name.clone(),
            dismissal: p.out_description.clone(),
            runs: p.batting.runs,
            balls: p.batting.balls_faced,
            fours: p.batting.fours,
            sixes: p.batting.sixes,
            strike_rate: strike_rate(p.batting.runs, p.batting.balls_faced),
            on_strike: striker == Some(p.id),
        })
        .collect()
}

fn bowling_rows(team: &Team) -> Vec<BowlingRow> {
    let mut players: Vec<_> = team.players.iter().filter(|p| p.has_bowled()).collect();
    players.sort_by_key(|p| p.bowling_position);
    players
        .into_iter()
        .map(|p| BowlingRow {
            name: p.name.clone(),
            overs: overs_notation(p.bowling.balls_bowled),
            runs: p.bowling.runs_conceded,
            wickets: p.bowling.wickets,
            extras: p.bowling.extras_bowled,
            economy: economy(p.bowling.runs_conceded, p.bowling.balls_bowled),
        })
        .collect()
}

fn chase_state(state: &Match) -> Option<ChaseState> {
    if !state.is_chasing() {
        return None;
    }
    let target = state.target()?;
    let runs = state.batting_team()?.runs;
    let runs_required = target.saturating_sub(runs);
    let balls_remaining = state
        .deliveries_per_innings()
        .saturating_sub(state.deliveries_bowled_that_count);
    let required_run_rate = if balls_remaining == 0 {
        "-".to_string()
    } else {
        economy(runs_required, balls_remaining)
    };

    Some(ChaseState {
        target,
        runs_required,
        balls_remaining,
        required_run_rate,
    })
}

/// One-line status of a match, used when listing stored matches
pub fn headline(state: &Match) -> String {
    let [first, second] = &state.teams;
    let title = format!("{} vs {}", first.name, second.name);

    if state.completed {
        return format!("{}: {}", title, state.result);
    }
    match state.batting_team() {
        Some(team) if state.started => format!(
            "{}: {} {}/{} ({} ov)",
            title,
            team.name,
            team.runs,
            team.wickets_lost,
            overs_notation(state.deliveries_bowled_that_count)
        ),
        _ => format!("{}: not started ({} overs, {} a side)", title, state.overs, state.team_size),
    }
}

impl fmt::Display for Scorecard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline)?;

        for card in &self.innings {
            writeln!(f)?;
            writeln!(
                f,
                "{} {}/{} ({} ov), extras {}",
                card.batting_team, card.runs, card.wickets, card.overs, card.extras
            )?;
            writeln!(f, "  {:<20} {:<28} {:>4} {:>4} {:>3} {:>3} {:>6}", "Batter", "", "R", "B", "4s", "6s", "SR")?;
            for row in &card.batting {
                let name = if row.on_strike {
                    format!("{}*", row.name)
                } else {
                    row.name.clone()
                };
                writeln!(
                    f,
                    "  {:<20} {:<28} {:>4} {:>4} {:>3} {:>3} {:>6}",
                    name, row.dismissal, row.runs, row.balls, row.fours, row.sixes, row.strike_rate
                )?;
            }
            writeln!(f, "  {:<20} {:>5} {:>4} {:>3} {:>6} {:>6}", "Bowler", "O", "R", "W", "Ext", "Econ")?;
            for row in &card.bowling {
                writeln!(
                    f,
                    "  {:<20} {:>5} {:>4} {:>3} {:>6} {:>6}",
                    row.name, row.overs, row.runs, row.wickets, row.extras, row.economy
                )?;
            }
        }

        if let Some(chase) = &self.chase {
            writeln!(f)?;
            writeln!(
                f,
                "Target {}: need {} from {} balls (RRR {})",
                chase.target, chase.runs_required, chase.balls_remaining, chase.required_run_rate
            )?;
        }
        if !self.this_over.is_empty() {
            writeln!(f, "This over: {}", self.this_over.join(" "))?;
        }
        if let Some(pending) = self.pending {
            writeln!(f, "Waiting: {}", pending)?;
        }
        if let Some(result) = &self.result {
            writeln!(f, "Result: {}", result)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overs_notation() {
        assert_eq!(overs_notation(0), "0.0");
        assert_eq!(overs_notation(5), "0.5");
        assert_eq!(overs_notation(6), "1.0");
        assert_eq!(overs_notation(17), "2.5");
    }

    #[test]
    fn test_strike_rate() {
        assert_eq!(strike_rate(0, 0), "0.0");
        assert_eq!(strike_rate(10, 8), "125.0");
        assert_eq!(strike_rate(1, 3), "33.3");
    }

    #[test]
    fn test_economy() {
        assert_eq!(economy(0, 0), "0.00");
        assert_eq!(economy(12, 12), "6.00");
        assert_eq!(economy(7, 4), "10.50");
    }
}
