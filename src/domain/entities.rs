//! Domain Entities - Player, Team, Delivery
//!
//! Pure data holders. Every counter here is mutated only by the scoring
//! engine; the entities themselves carry no scoring rules beyond simple
//! lookups and the "has this player batted" style predicates the engine
//! needs for eligibility checks.

use crate::domain::outcome::DeliveryCode;
use crate::shared::ids::PlayerId;
use serde::{Deserialize, Serialize};

/// Dismissal text of a batter who is not (yet) out
pub const NOT_OUT: &str = "not out";

/// Dismissal text of a batter who left the field injured and may return
pub const RETIRED_HURT: &str = "retired hurt";

/// `additional_info` marker for runs struck off the bat on a no-ball
pub const BAT_RUNS_MARKER: &str = "*";

/// Batting figures of one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingFigures {
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
}

/// Bowling figures of one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingFigures {
    pub balls_bowled: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub extras_bowled: u32,
}

/// A player and everything scored against their name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub batting: BattingFigures,
    pub bowling: BowlingFigures,
    /// 0 = not yet batted, 1 = opening striker, 2 = opening non-striker,
    /// 3+ = order of entry
    pub batting_position: u32,
    /// 0 = has not bowled, N = Nth distinct bowler used
    pub bowling_position: u32,
    pub out_description: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            batting: BattingFigures::default(),
            bowling: BowlingFigures::default(),
            batting_position: 0,
            bowling_position: 0,
            out_description: NOT_OUT.to_string(),
        }
    }

    pub fn has_batted(&self) -> bool {
        self.batting_position > 0
    }

    pub fn has_bowled(&self) -> bool {
        self.bowling_position > 0
    }

    pub fn is_not_out(&self) -> bool {
        self.out_description == NOT_OUT
    }

    pub fn is_retired_hurt(&self) -> bool {
        self.out_description == RETIRED_HURT
    }

    /// Whether the player may walk out as the next batter
    pub fn can_come_in(&self) -> bool {
        !self.has_batted() || self.is_retired_hurt()
    }
}

/// A side: totals plus the players that make it up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub runs: u32,
    pub extras: u32,
    pub wickets_lost: u32,
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self {
            name: name.into(),
            runs: 0,
            extras: 0,
            wickets_lost: 0,
            players,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        let name = name.trim();
        self.players.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// Sum of every player's batting runs
    pub fn runs_off_the_bat(&self) -> u32 {
        self.players.iter().map(|p| p.batting.runs).sum()
    }
}

/// One entry in the current-over log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    /// Position within the current over's log
    pub index: u32,
    pub outcome: DeliveryCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl Delivery {
    pub fn new(index: u32, outcome: DeliveryCode, runs_off_bat: bool) -> Self {
        Self {
            index,
            outcome,
            additional_info: runs_off_bat.then(|| BAT_RUNS_MARKER.to_string()),
        }
    }

    /// Whether the runs of a no-ball record went to the striker
    pub fn has_bat_runs_marker(&self) -> bool {
        self.additional_info.as_deref() == Some(BAT_RUNS_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_is_not_out() {
        let player = Player::new(PlayerId(1), "Asha");
        assert!(player.is_not_out());
        assert!(!player.has_batted());
        assert!(!player.has_bowled());
        assert!(player.can_come_in());
    }

    #[test]
    fn test_retired_hurt_player_can_return() {
        let mut player = Player::new(PlayerId(1), "Asha");
        player.batting_position = 3;
        assert!(!player.can_come_in());

        player.out_description = RETIRED_HURT.to_string();
        assert!(player.can_come_in());
    }

    #[test]
    fn test_team_lookup_by_name_ignores_case() {
        let team = Team::new(
            "Lions",
            vec![Player::new(PlayerId(1), "Asha"), Player::new(PlayerId(2), "Ben")],
        );
        assert_eq!(team.player_by_name(" ben ").map(|p| p.id), Some(PlayerId(2)));
        assert!(team.player_by_name("Cal").is_none());
        assert!(team.contains(PlayerId(1)));
        assert!(!team.contains(PlayerId(3)));
    }

    #[test]
    fn test_delivery_marker() {
        let marked = Delivery::new(0, DeliveryCode::NoBall(2), true);
        let plain = Delivery::new(1, DeliveryCode::NoBall(2), false);
        assert!(marked.has_bat_runs_marker());
        assert!(!plain.has_bat_runs_marker());

        let json = serde_json::to_string(&plain).unwrap();
        assert_eq!(json, r#"{"index":1,"outcome":"2nb"}"#);
    }
}
