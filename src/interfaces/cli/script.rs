//! 记分脚本
//!
//! JSON 脚本格式：比赛定义 + 按顺序执行的步骤，球员用名字表示。
//!
//! ```json
//! {
//!   "match": { "overs": 2, "team_size": 3, "teams": [ ... ] },
//!   "steps": [
//!     { "step": "start", "batting_first": "Lions", "striker": "Asha", "non_striker": "Ben", "bowler": "Dev" },
//!     { "step": "runs", "runs": 4 },
//!     { "step": "wicket", "how": "caught", "fielder": "Eli", "next": "Cal" }
//!   ]
//! }
//! ```
//!
//! 名字在执行前解析成 PlayerId；缺少必填项时直接报错，不调用引擎。

use crate::application::dto::ScoringCommand;
use crate::domain::{Dismissal, DismissalMode, Match, MatchSetup, Outcome, RunOutBall, Team};
use crate::shared::ids::{MatchId, PlayerId};
use serde::Deserialize;
use thiserror::Error;

/// 完整脚本
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(rename = "match")]
    pub setup: MatchSetup,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// 单个步骤
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Start {
        batting_first: String,
        striker: String,
        non_striker: String,
        bowler: String,
    },
    Runs {
        runs: u8,
    },
    Wide {
        #[serde(default)]
        runs: u8,
    },
    NoBall {
        #[serde(default)]
        runs: u8,
        #[serde(default)]
        hit: bool,
    },
    Bye {
        runs: u8,
    },
    LegBye {
        runs: u8,
    },
    Wicket(WicketStep),
    Undo,
    Bowler {
        name: String,
    },
    SwitchInnings {
        striker: String,
        non_striker: String,
        bowler: String,
    },
    Complete,
}

/// 出局步骤：字段是否必填取决于 `how`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WicketStep {
    pub how: String,
    #[serde(default)]
    pub fielder: Option<String>,
    /// 被跑出/退场的击球手
    #[serde(default)]
    pub batter: Option<String>,
    /// 下一位上场的击球手
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub crossed: bool,
    #[serde(default)]
    pub on_wide: bool,
    /// 跑出前完成的跑动分
    #[serde(default)]
    pub runs: Option<u8>,
    /// "legal" / "wide" / "no_ball"
    #[serde(default)]
    pub ball: Option<String>,
    #[serde(default)]
    pub off_bat: bool,
}

/// 步骤解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("incomplete input: {0} is required")]
    Incomplete(&'static str),

    #[error("no player named {name:?} in {team}")]
    UnknownPlayer { name: String, team: String },

    #[error("{0} is not known at this point of the match")]
    NoTeamInRole(&'static str),

    #[error("unknown dismissal {0:?}")]
    UnknownDismissal(String),

    #[error("unknown run-out ball {0:?}")]
    UnknownBall(String),
}

fn resolve(team: &Team, name: &str) -> Result<PlayerId, StepError> {
    team.player_by_name(name)
        .map(|p| p.id)
        .ok_or_else(|| StepError::UnknownPlayer {
            name: name.to_string(),
            team: team.name.clone(),
        })
}

fn required<'a>(value: &'a Option<String>, what: &'static str) -> Result<&'a str, StepError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(StepError::Incomplete(what))
}

impl Step {
    /// 把步骤翻译成命令；名字按当前比赛状态解析
    pub fn to_command(&self, match_id: MatchId, state: &Match) -> Result<ScoringCommand, StepError> {
        let batting = || state.batting_team().ok_or(StepError::NoTeamInRole("batting team"));
        let bowling = || state.bowling_team().ok_or(StepError::NoTeamInRole("bowling team"));
        let record = |outcome: Outcome| ScoringCommand::RecordDelivery { match_id, outcome };

        let command = match self {
            Step::Start {
                batting_first,
                striker,
                non_striker,
                bowler,
            } => {
                let side = state.side_named(batting_first).ok_or_else(|| StepError::UnknownPlayer {
                    name: batting_first.clone(),
                    team: "either team".to_string(),
                })?;
                let bat = state.team(side);
                let bowl = state.team(side.other());
                ScoringCommand::StartMatch {
                    match_id,
                    batting_first: batting_first.clone(),
                    striker: resolve(bat, striker)?,
                    non_striker: resolve(bat, non_striker)?,
                    bowler: resolve(bowl, bowler)?,
                }
            }
            Step::Runs { runs } => record(Outcome::Runs(*runs)),
            Step::Wide { runs } => record(Outcome::Wide(*runs)),
            Step::NoBall { runs, hit } => record(Outcome::NoBall {
                runs: *runs,
                hit_ball: *hit,
            }),
            Step::Bye { runs } => record(Outcome::Bye(*runs)),
            Step::LegBye { runs } => record(Outcome::LegBye(*runs)),
            Step::Wicket(wicket) => record(Outcome::Wicket(wicket.to_dismissal(batting()?, bowling()?)?)),
            Step::Undo => ScoringCommand::UndoLastDelivery { match_id },
            Step::Bowler { name } => ScoringCommand::ChangeBowler {
                match_id,
                bowler: resolve(bowling()?, name)?,
            },
            Step::SwitchInnings {
                striker,
                non_striker,
                bowler,
            } => {
                // 角色尚未交换：当前防守方即将上场击球
                let next_batting = bowling()?;
                let next_bowling = batting()?;
                ScoringCommand::SwitchInnings {
                    match_id,
                    striker: resolve(next_batting, striker)?,
                    non_striker: resolve(next_batting, non_striker)?,
                    bowler: resolve(next_bowling, bowler)?,
                }
            }
            Step::Complete => ScoringCommand::CompleteMatch { match_id },
        };
        Ok(command)
    }
}

impl WicketStep {
    fn to_dismissal(&self, batting: &Team, bowling: &Team) -> Result<Dismissal, StepError> {
        let fielder = || resolve(bowling, required(&self.fielder, "fielder")?);
        let batter = || resolve(batting, required(&self.batter, "batter")?);

        let mode = match self.how.trim().to_ascii_lowercase().as_str() {
            "bowled" => DismissalMode::Bowled,
            "lbw" => DismissalMode::Lbw,
            "caught" => DismissalMode::Caught {
                fielder: fielder()?,
                crossed_over: self.crossed,
            },
            "stumped" => DismissalMode::Stumped {
                fielder: fielder()?,
                on_wide: self.on_wide,
            },
            "hit_wicket" => DismissalMode::HitWicket { on_wide: self.on_wide },
            "run_out" => {
                let runs_completed = self.runs.ok_or(StepError::Incomplete("runs completed"))?;
                let ball = match self.ball.as_deref().unwrap_or("legal") {
                    "legal" => RunOutBall::Legal { off_bat: self.off_bat },
                    "wide" => RunOutBall::Wide,
                    "no_ball" => RunOutBall::NoBall { off_bat: self.off_bat },
                    other => return Err(StepError::UnknownBall(other.to_string())),
                };
                DismissalMode::RunOut {
                    fielder: fielder()?,
                    batter: batter()?,
                    runs_completed,
                    crossed_over: self.crossed,
                    ball,
                }
            }
            "retired_out" => DismissalMode::RetiredOut { batter: batter()? },
            "retired_hurt" => DismissalMode::RetiredHurt { batter: batter()? },
            other => return Err(StepError::UnknownDismissal(other.to_string())),
        };

        let next_batter = match self.next.as_deref() {
            Some(name) => Some(resolve(batting, name)?),
            None => None,
        };
        Ok(Dismissal { mode, next_batter })
    }
}
