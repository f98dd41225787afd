//! Score deltas
//!
//! Every non-wicket outcome, and the run component of every wicket, is
//! turned into one `ScoreDelta`. Recording applies it, undo reverts the
//! same delta, so the two can never drift apart.

use crate::domain::match_state::Match;
use crate::domain::outcome::{Outcome, RunOutBall};

/// Counter changes caused by one delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreDelta {
    /// Added to the batting team's total
    pub team_runs: u32,
    /// Part of `team_runs` not credited to a batter
    pub team_extras: u32,
    /// Runs credited to the striker
    pub bat_runs: u32,
    /// The striker received the ball
    pub ball_faced: bool,
    /// Counts toward the over and the bowler's balls
    pub legal: bool,
    pub runs_conceded: u32,
    pub extras_bowled: u32,
    /// Runs completed by running, used for the strike parity rule
    pub running_runs: u32,
    /// Bat runs of 4 or 6 count as a boundary
    pub boundary: bool,
}

impl ScoreDelta {
    /// Runs off the bat on a legal ball
    pub fn bat(runs: u8) -> Self {
        let runs = u32::from(runs);
        Self {
            team_runs: runs,
            bat_runs: runs,
            ball_faced: true,
            legal: true,
            runs_conceded: runs,
            running_runs: runs,
            boundary: true,
            ..Self::default()
        }
    }

    /// The one-run wide penalty plus `extra` further runs
    pub fn wide(extra: u8) -> Self {
        let total = 1 + u32::from(extra);
        Self {
            team_runs: total,
            team_extras: total,
            runs_conceded: total,
            extras_bowled: total,
            running_runs: u32::from(extra),
            ..Self::default()
        }
    }

    /// The one-run no-ball penalty plus `runs`, split between bat and
    /// extras depending on whether the striker hit the ball
    pub fn no_ball(runs: u8, hit_ball: bool) -> Self {
        let runs = u32::from(runs);
        let (bat_runs, extras) = if hit_ball && runs > 0 {
            (runs, 1)
        } else {
            (0, 1 + runs)
        };
        Self {
            team_runs: 1 + runs,
            team_extras: extras,
            bat_runs,
            ball_faced: true,
            runs_conceded: 1 + runs,
            extras_bowled: extras,
            running_runs: runs,
            boundary: bat_runs > 0,
            ..Self::default()
        }
    }

    /// Byes or leg byes on a legal ball; not charged to the bowler's runs
    pub fn byes(runs: u8) -> Self {
        let runs = u32::from(runs);
        Self {
            team_runs: runs,
            team_extras: runs,
            ball_faced: true,
            legal: true,
            extras_bowled: runs,
            running_runs: runs,
            ..Self::default()
        }
    }

    /// A wicket ball with no runs
    pub fn dead_ball(legal: bool) -> Self {
        Self {
            ball_faced: legal,
            legal,
            ..Self::default()
        }
    }

    /// Runs completed before a run out, credited by the kind of ball.
    /// They were run, so they never count as a four or a six.
    pub fn run_out(runs: u8, ball: RunOutBall) -> Self {
        let delta = match ball {
            RunOutBall::Legal { off_bat: true } => Self::bat(runs),
            RunOutBall::Legal { off_bat: false } if runs == 0 => Self::dead_ball(true),
            RunOutBall::Legal { off_bat: false } => Self::byes(runs),
            RunOutBall::Wide => Self::wide(runs),
            RunOutBall::NoBall { off_bat } => Self::no_ball(runs, off_bat),
        };
        Self {
            boundary: false,
            ..delta
        }
    }

    /// Delta of a non-wicket outcome
    pub fn for_outcome(outcome: &Outcome) -> Option<Self> {
        match outcome {
            Outcome::Runs(runs) => Some(Self::bat(*runs)),
            Outcome::Wide(extra) => Some(Self::wide(*extra)),
            Outcome::NoBall { runs, hit_ball } => Some(Self::no_ball(*runs, *hit_ball)),
            Outcome::Bye(runs) | Outcome::LegBye(runs) => Some(Self::byes(*runs)),
            Outcome::Wicket(_) => None,
        }
    }

    /// Whether the batters end up at opposite ends from where they started
    pub fn odd_running(&self) -> bool {
        self.running_runs % 2 == 1
    }

    pub fn apply(&self, state: &mut Match) {
        self.shift(state, true);
    }

    pub fn revert(&self, state: &mut Match) {
        self.shift(state, false);
    }

    fn shift(&self, state: &mut Match, forward: bool) {
        let step = |value: &mut u32, by: u32| {
            if forward {
                *value += by;
            } else {
                *value = value.saturating_sub(by);
            }
        };
        let flag = |b: bool| u32::from(b);

        let striker = state.striker;
        let bowler = state.bowler;
        if let Some((batting, bowling)) = state.sides_mut() {
            step(&mut batting.runs, self.team_runs);
            step(&mut batting.extras, self.team_extras);

            if let Some(player) = striker.and_then(|id| batting.player_mut(id)) {
                let figures = &mut player.batting;
                step(&mut figures.runs, self.bat_runs);
                step(&mut figures.balls_faced, flag(self.ball_faced));
                step(&mut figures.fours, flag(self.boundary && self.bat_runs == 4));
                step(&mut figures.sixes, flag(self.boundary && self.bat_runs == 6));
            }

            if let Some(player) = bowler.and_then(|id| bowling.player_mut(id)) {
                let figures = &mut player.bowling;
                step(&mut figures.balls_bowled, flag(self.legal));
                step(&mut figures.runs_conceded, self.runs_conceded);
                step(&mut figures.extras_bowled, self.extras_bowled);
            }
        }

        step(&mut state.deliveries_bowled_that_count, flag(self.legal));
    }
}
