//! Outcome Taxonomy
//!
//! The closed set of things that can happen on one delivery. Every variant
//! carries exactly the parameters the scoring engine needs, so the engine
//! handles them with one exhaustive `match` rather than a bag of optional
//! arguments.
//!
//! ## Delivery codes
//! Each recorded delivery is logged with a short code:
//! - `"n"` runs off the bat (0..=8)
//! - `"{e}wd"` wide plus `e` further runs
//! - `"{e}nb"` no-ball plus `e` further runs
//! - `"{n}b"` / `"{n}lb"` byes and leg byes
//! - `"W"` any dismissal

use crate::shared::ids::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest run count off the bat (a four plus four overthrows)
pub const MAX_BAT_RUNS: u8 = 8;
/// Largest number of runs added to the one-run wide penalty
pub const MAX_WIDE_RUNS: u8 = 4;
/// Largest number of runs added to the one-run no-ball penalty
pub const MAX_NO_BALL_RUNS: u8 = 6;
/// Largest number of byes or leg byes
pub const MAX_BYES: u8 = 4;
/// Largest number of runs completed before a run out
pub const MAX_RUN_OUT_RUNS: u8 = 4;

/// What happened on one delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Runs off the bat, including any overthrows
    Runs(u8),
    /// A wide plus `extra_runs` run or conceded beyond the penalty
    Wide(u8),
    /// A no-ball plus `runs`; when `hit_ball` those runs belong to the striker
    NoBall { runs: u8, hit_ball: bool },
    Bye(u8),
    LegBye(u8),
    Wicket(Dismissal),
}

/// A dismissal and the batter who replaces the dismissed one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub mode: DismissalMode,
    /// Required unless the wicket ends the innings
    #[serde(default)]
    pub next_batter: Option<PlayerId>,
}

/// How the batter got out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissalMode {
    Bowled,
    Lbw,
    Caught {
        fielder: PlayerId,
        /// The batters crossed before the catch was taken
        crossed_over: bool,
    },
    Stumped {
        fielder: PlayerId,
        on_wide: bool,
    },
    HitWicket {
        on_wide: bool,
    },
    RunOut {
        fielder: PlayerId,
        /// Striker or non-striker
        batter: PlayerId,
        runs_completed: u8,
        /// The batters crossed on the run that was cut short
        crossed_over: bool,
        ball: RunOutBall,
    },
    RetiredOut {
        batter: PlayerId,
    },
    RetiredHurt {
        batter: PlayerId,
    },
}

/// The kind of delivery a run out happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutBall {
    /// A legal ball; runs are byes unless struck off the bat
    Legal { off_bat: bool },
    Wide,
    NoBall { off_bat: bool },
}

impl DismissalMode {
    /// Short label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            DismissalMode::Bowled => "bowled",
            DismissalMode::Lbw => "lbw",
            DismissalMode::Caught { .. } => "caught",
            DismissalMode::Stumped { .. } => "stumped",
            DismissalMode::HitWicket { .. } => "hit_wicket",
            DismissalMode::RunOut { .. } => "run_out",
            DismissalMode::RetiredOut { .. } => "retired_out",
            DismissalMode::RetiredHurt { .. } => "retired_hurt",
        }
    }

    /// Whether the bowler is credited with the wicket
    pub fn credits_bowler(&self) -> bool {
        matches!(
            self,
            DismissalMode::Bowled
                | DismissalMode::Lbw
                | DismissalMode::Caught { .. }
                | DismissalMode::Stumped { .. }
                | DismissalMode::HitWicket { .. }
        )
    }

    /// Whether the wicket fell on a ball that counts toward the over
    pub fn is_legal_delivery(&self) -> bool {
        match self {
            DismissalMode::Bowled | DismissalMode::Lbw | DismissalMode::Caught { .. } => true,
            DismissalMode::Stumped { on_wide, .. } | DismissalMode::HitWicket { on_wide } => !on_wide,
            DismissalMode::RunOut { ball, .. } => matches!(ball, RunOutBall::Legal { .. }),
            DismissalMode::RetiredOut { .. } | DismissalMode::RetiredHurt { .. } => false,
        }
    }

    /// The batter leaving the field; `None` means the striker
    pub fn named_batter(&self) -> Option<PlayerId> {
        match self {
            DismissalMode::RunOut { batter, .. }
            | DismissalMode::RetiredOut { batter }
            | DismissalMode::RetiredHurt { batter } => Some(*batter),
            _ => None,
        }
    }

    /// Fielder that has to belong to the bowling side
    pub fn fielder(&self) -> Option<PlayerId> {
        match self {
            DismissalMode::Caught { fielder, .. }
            | DismissalMode::Stumped { fielder, .. }
            | DismissalMode::RunOut { fielder, .. } => Some(*fielder),
            _ => None,
        }
    }
}

impl Outcome {
    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Runs(_) => "runs",
            Outcome::Wide(_) => "wide",
            Outcome::NoBall { .. } => "no_ball",
            Outcome::Bye(_) => "bye",
            Outcome::LegBye(_) => "leg_bye",
            Outcome::Wicket(_) => "wicket",
        }
    }

    /// Whether the delivery counts toward the six-ball over
    pub fn is_legal(&self) -> bool {
        match self {
            Outcome::Runs(_) | Outcome::Bye(_) | Outcome::LegBye(_) => true,
            Outcome::Wide(_) | Outcome::NoBall { .. } => false,
            Outcome::Wicket(dismissal) => dismissal.mode.is_legal_delivery(),
        }
    }

    /// Checks the run counts carried by the outcome
    pub fn check_ranges(&self) -> Result<(), String> {
        let check = |what: &str, value: u8, min: u8, max: u8| {
            if value < min || value > max {
                Err(format!("{} must be between {} and {}, got {}", what, min, max, value))
            } else {
                Ok(())
            }
        };

        match self {
            Outcome::Runs(runs) => check("runs off the bat", *runs, 0, MAX_BAT_RUNS),
            Outcome::Wide(extra) => check("runs on a wide", *extra, 0, MAX_WIDE_RUNS),
            Outcome::NoBall { runs, .. } => check("runs on a no-ball", *runs, 0, MAX_NO_BALL_RUNS),
            Outcome::Bye(runs) => check("byes", *runs, 1, MAX_BYES),
            Outcome::LegBye(runs) => check("leg byes", *runs, 1, MAX_BYES),
            Outcome::Wicket(Dismissal {
                mode: DismissalMode::RunOut { runs_completed, .. },
                ..
            }) => check("runs completed before the run out", *runs_completed, 0, MAX_RUN_OUT_RUNS),
            Outcome::Wicket(_) => Ok(()),
        }
    }

    /// Log code of the delivery
    pub fn code(&self) -> DeliveryCode {
        match self {
            Outcome::Runs(runs) => DeliveryCode::Runs(*runs),
            Outcome::Wide(extra) => DeliveryCode::Wide(*extra),
            Outcome::NoBall { runs, .. } => DeliveryCode::NoBall(*runs),
            Outcome::Bye(runs) => DeliveryCode::Bye(*runs),
            Outcome::LegBye(runs) => DeliveryCode::LegBye(*runs),
            Outcome::Wicket(_) => DeliveryCode::Wicket,
        }
    }

    /// Whether the runs of a no-ball are credited to the striker
    pub fn runs_off_bat_on_no_ball(&self) -> bool {
        matches!(self, Outcome::NoBall { runs, hit_ball: true } if *runs > 0)
    }
}

/// Compact log code of a recorded delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DeliveryCode {
    Runs(u8),
    Wide(u8),
    NoBall(u8),
    Bye(u8),
    LegBye(u8),
    Wicket,
}

impl DeliveryCode {
    pub fn is_wicket(&self) -> bool {
        matches!(self, DeliveryCode::Wicket)
    }

    /// Rebuilds the outcome that produced this code, given the no-ball
    /// marker. Wickets cannot be rebuilt.
    pub fn to_outcome(self, bat_runs_marker: bool) -> Option<Outcome> {
        match self {
            DeliveryCode::Runs(runs) => Some(Outcome::Runs(runs)),
            DeliveryCode::Wide(extra) => Some(Outcome::Wide(extra)),
            DeliveryCode::NoBall(runs) => Some(Outcome::NoBall {
                runs,
                hit_ball: bat_runs_marker,
            }),
            DeliveryCode::Bye(runs) => Some(Outcome::Bye(runs)),
            DeliveryCode::LegBye(runs) => Some(Outcome::LegBye(runs)),
            DeliveryCode::Wicket => None,
        }
    }
}

impl fmt::Display for DeliveryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryCode::Runs(runs) => write!(f, "{}", runs),
            DeliveryCode::Wide(extra) => write!(f, "{}wd", extra),
            DeliveryCode::NoBall(runs) => write!(f, "{}nb", runs),
            DeliveryCode::Bye(runs) => write!(f, "{}b", runs),
            DeliveryCode::LegBye(runs) => write!(f, "{}lb", runs),
            DeliveryCode::Wicket => write!(f, "W"),
        }
    }
}

/// Error parsing a delivery code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid delivery code: {0:?}")]
pub struct ParseDeliveryCodeError(pub String);

impl FromStr for DeliveryCode {
    type Err = ParseDeliveryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "W" {
            return Ok(DeliveryCode::Wicket);
        }

        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, suffix) = s.split_at(split);
        let runs: u8 = digits
            .parse()
            .map_err(|_| ParseDeliveryCodeError(s.to_string()))?;

        match suffix {
            "" => Ok(DeliveryCode::Runs(runs)),
            "wd" => Ok(DeliveryCode::Wide(runs)),
            "nb" => Ok(DeliveryCode::NoBall(runs)),
            "b" => Ok(DeliveryCode::Bye(runs)),
            "lb" => Ok(DeliveryCode::LegBye(runs)),
            _ => Err(ParseDeliveryCodeError(s.to_string())),
        }
    }
}

impl From<DeliveryCode> for String {
    fn from(code: DeliveryCode) -> Self {
        code.to_string()
    }
}

impl TryFrom<String> for DeliveryCode {
    type Error = ParseDeliveryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_out(ball: RunOutBall) -> DismissalMode {
        DismissalMode::RunOut {
            fielder: PlayerId(20),
            batter: PlayerId(1),
            runs_completed: 1,
            crossed_over: false,
            ball,
        }
    }

    #[test]
    fn test_codes_parse_back() {
        for code in ["0", "6", "8", "0wd", "3wd", "1nb", "4b", "2lb", "W"] {
            let parsed: DeliveryCode = code.parse().unwrap();
            assert_eq!(parsed.to_string(), code);
        }
    }

    #[test]
    fn test_invalid_codes() {
        assert!("".parse::<DeliveryCode>().is_err());
        assert!("wd".parse::<DeliveryCode>().is_err());
        assert!("2x".parse::<DeliveryCode>().is_err());
        assert!("w".parse::<DeliveryCode>().is_err());
    }

    #[test]
    fn test_legality() {
        assert!(Outcome::Runs(0).is_legal());
        assert!(Outcome::Bye(2).is_legal());
        assert!(!Outcome::Wide(0).is_legal());
        assert!(!Outcome::NoBall { runs: 1, hit_ball: true }.is_legal());

        assert!(DismissalMode::Bowled.is_legal_delivery());
        assert!(!DismissalMode::Stumped { fielder: PlayerId(20), on_wide: true }.is_legal_delivery());
        assert!(run_out(RunOutBall::Legal { off_bat: true }).is_legal_delivery());
        assert!(!run_out(RunOutBall::Wide).is_legal_delivery());
        assert!(!run_out(RunOutBall::NoBall { off_bat: false }).is_legal_delivery());
        assert!(!DismissalMode::RetiredHurt { batter: PlayerId(1) }.is_legal_delivery());
    }

    #[test]
    fn test_ranges() {
        assert!(Outcome::Runs(8).check_ranges().is_ok());
        assert!(Outcome::Runs(9).check_ranges().is_err());
        assert!(Outcome::Wide(5).check_ranges().is_err());
        assert!(Outcome::Bye(0).check_ranges().is_err());
        assert!(Outcome::LegBye(4).check_ranges().is_ok());
        assert!(Outcome::NoBall { runs: 6, hit_ball: true }.check_ranges().is_ok());
    }

    #[test]
    fn test_no_ball_marker_only_with_bat_runs() {
        assert!(Outcome::NoBall { runs: 2, hit_ball: true }.runs_off_bat_on_no_ball());
        assert!(!Outcome::NoBall { runs: 0, hit_ball: true }.runs_off_bat_on_no_ball());
        assert!(!Outcome::NoBall { runs: 2, hit_ball: false }.runs_off_bat_on_no_ball());
    }

    #[test]
    fn test_rebuild_outcome_from_code() {
        assert_eq!(
            DeliveryCode::NoBall(4).to_outcome(true),
            Some(Outcome::NoBall { runs: 4, hit_ball: true })
        );
        assert_eq!(DeliveryCode::Wicket.to_outcome(false), None);
        assert!(DeliveryCode::Wicket.is_wicket());
        assert!(!DeliveryCode::Runs(0).is_wicket());
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = Outcome::NoBall { runs: 1, hit_ball: true };
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"no_ball":{"runs":1,"hit_ball":true}}"#);
        let back: Outcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }
}
