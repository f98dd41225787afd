//! Match aggregate
//!
//! Owns both teams, the role pointers into them and the current-over log.
//! Player relations (striker, non-striker, bowler) are plain ids resolved
//! through the teams; nothing here holds a reference into another entity.

use crate::domain::entities::{Delivery, Player, Team};
use crate::shared::ids::{MatchId, PlayerId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Legal deliveries in one over
pub const BALLS_PER_OVER: u32 = 6;

/// Current-over log; an over rarely exceeds eight entries
pub type OverLog = SmallVec<[Delivery; 8]>;

/// Which of the two teams created with the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    First,
    Second,
}

impl TeamSide {
    pub fn other(self) -> Self {
        match self {
            TeamSide::First => TeamSide::Second,
            TeamSide::Second => TeamSide::First,
        }
    }

    fn index(self) -> usize {
        match self {
            TeamSide::First => 0,
            TeamSide::Second => 1,
        }
    }
}

/// Transition the match is waiting for before the next delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingAction {
    /// An over was completed; a different bowler must be chosen
    SelectBowler,
    /// The first innings is over; the second-innings lineup must be chosen
    SwitchInnings,
    /// The second innings is over; the result must be confirmed
    CompleteMatch,
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingAction::SelectBowler => write!(f, "a new bowler must be selected"),
            PendingAction::SwitchInnings => write!(f, "the innings must be switched"),
            PendingAction::CompleteMatch => write!(f, "the match must be completed"),
        }
    }
}

/// Team definition used to create a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSetup {
    pub name: String,
    pub players: Vec<String>,
}

/// Everything needed to create a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub overs: u32,
    pub team_size: u32,
    pub teams: [TeamSetup; 2],
}

/// The scored match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub overs: u32,
    /// Legal deliveries across both innings (`overs * 12`)
    pub total_deliveries: u32,
    pub team_size: u32,
    pub teams: [Team; 2],

    pub batting_first: Option<TeamSide>,
    pub current_batting: Option<TeamSide>,
    pub current_bowling: Option<TeamSide>,

    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub bowler: Option<PlayerId>,
    /// Bowler of the over just completed
    pub previous_bowler: Option<PlayerId>,

    /// Legal and illegal deliveries in the current over
    pub deliveries_bowled: u32,
    /// Legal deliveries in the current innings
    pub deliveries_bowled_that_count: u32,
    pub first_innings_deliveries_bowled_that_count: u32,
    pub num_different_bowlers: u32,
    pub batters_sent_in: u32,
    pub bowler_has_not_started_over: bool,

    pub started: bool,
    pub first_innings_finished: bool,
    pub completed: bool,
    pub pending: Option<PendingAction>,
    pub result: String,

    pub current_over: OverLog,
}

impl Match {
    /// Creates a match with every counter zeroed. The setup is expected to
    /// have passed validation already.
    pub fn new(id: MatchId, setup: &MatchSetup) -> Self {
        let mut next_id = 1u32;
        let teams = setup.teams.clone().map(|team| {
            let players = team
                .players
                .iter()
                .map(|name| {
                    let player = Player::new(PlayerId(next_id), name.trim());
                    next_id += 1;
                    player
                })
                .collect();
            Team::new(team.name.trim(), players)
        });

        Self {
            id,
            overs: setup.overs,
            total_deliveries: setup.overs * BALLS_PER_OVER * 2,
            team_size: setup.team_size,
            teams,
            batting_first: None,
            current_batting: None,
            current_bowling: None,
            striker: None,
            non_striker: None,
            bowler: None,
            previous_bowler: None,
            deliveries_bowled: 0,
            deliveries_bowled_that_count: 0,
            first_innings_deliveries_bowled_that_count: 0,
            num_different_bowlers: 0,
            batters_sent_in: 0,
            bowler_has_not_started_over: true,
            started: false,
            first_innings_finished: false,
            completed: false,
            pending: None,
            result: String::new(),
            current_over: OverLog::new(),
        }
    }

    /// Legal deliveries allowed per innings
    pub fn deliveries_per_innings(&self) -> u32 {
        self.total_deliveries / 2
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        &self.teams[side.index()]
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        &mut self.teams[side.index()]
    }

    /// Side whose name matches, ignoring case and surrounding whitespace
    pub fn side_named(&self, name: &str) -> Option<TeamSide> {
        let name = name.trim();
        [TeamSide::First, TeamSide::Second]
            .into_iter()
            .find(|side| self.team(*side).name.eq_ignore_ascii_case(name))
    }

    pub fn batting_team(&self) -> Option<&Team> {
        self.current_batting.map(|side| self.team(side))
    }

    pub fn bowling_team(&self) -> Option<&Team> {
        self.current_bowling.map(|side| self.team(side))
    }

    pub fn batting_team_mut(&mut self) -> Option<&mut Team> {
        let side = self.current_batting?;
        Some(self.team_mut(side))
    }

    pub fn bowling_team_mut(&mut self) -> Option<&mut Team> {
        let side = self.current_bowling?;
        Some(self.team_mut(side))
    }

    /// Batting and bowling teams borrowed together
    pub fn sides_mut(&mut self) -> Option<(&mut Team, &mut Team)> {
        let batting = self.current_batting?;
        let [first, second] = &mut self.teams;
        Some(match batting {
            TeamSide::First => (first, second),
            TeamSide::Second => (second, first),
        })
    }

    /// Looks a player up in either team
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.teams.iter().find_map(|team| team.player(id))
    }

    pub fn is_at_crease(&self, id: PlayerId) -> bool {
        self.striker == Some(id) || self.non_striker == Some(id)
    }

    /// Swaps striker and non-striker
    pub fn rotate_strike(&mut self) {
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }

    /// Whether the second innings is under way
    pub fn is_chasing(&self) -> bool {
        self.first_innings_finished && !self.completed
    }

    /// Runs the chasing side has to pass, once the first innings is over
    pub fn target(&self) -> Option<u32> {
        if !self.first_innings_finished {
            return None;
        }
        self.bowling_team().map(|team| team.runs + 1)
    }

    /// Appends a record to the current-over log
    pub fn push_delivery(&mut self, delivery: Delivery) {
        self.current_over.push(delivery);
        self.deliveries_bowled += 1;
    }

    /// Discards the current-over log at an over or innings boundary
    pub fn clear_over(&mut self) {
        self.current_over.clear();
        self.deliveries_bowled = 0;
    }
}
