/// CLI Interface Module
///
/// This module provides the command-line entry point of the scorer.
///
/// ## Responsibilities
/// - Parse command-line arguments
/// - Initialize logging and the match store
/// - Replay a JSON scoring script through the scoring actor
/// - Print the scorecard, or list stored matches when no script is given

pub mod script;

use crate::application::{ScoringActor, ScoringCommand, ScoringHandle, ScoringReply, ScoringService, ServiceError, UndoOutcome};
use crate::domain::{Match, Scorecard};
use crate::domain::summary::headline;
use crate::infrastructure::persistence::{InMemoryMatchStore, JsonFileMatchStore, MatchStore, StoreError};
use crate::shared::ids::MatchId;
use crate::shared::metrics::METRICS;
use clap::{Parser, ValueEnum};
use script::{Script, StepError};
use std::path::PathBuf;
use thiserror::Error;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// 记分器命令行配置
#[derive(Parser, Debug, Clone)]
#[command(name = "cricket-scorer")]
#[command(version = "0.1.0")]
#[command(about = "板球逐球记分引擎", long_about = None)]
pub struct CliConfig {
    /// 比赛数据目录（每场比赛一个 JSON 文件）
    #[arg(short = 'd', long, default_value = "matches")]
    pub data_dir: PathBuf,

    /// 要回放的记分脚本；不指定时列出已保存的比赛
    #[arg(short = 's', long)]
    pub script: Option<PathBuf>,

    /// 日志级别
    #[arg(short = 'l', long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    /// 输出格式
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// 结束时打印 Prometheus 指标
    #[arg(long, default_value_t = false)]
    pub print_metrics: bool,

    /// 只在内存中回放脚本，不写入数据目录
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// CLI 错误
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read script {path}: {source}")]
    ReadScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid script: {0}")]
    ParseScript(#[from] serde_json::Error),

    #[error("step {step}: {source}")]
    Input {
        step: usize,
        #[source]
        source: StepError,
    },

    #[error("step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: ServiceError,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unexpected reply to {0}")]
    UnexpectedReply(&'static str),

    #[error("failed to export metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("scoring actor stopped: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Runs the CLI application
///
/// Parses command-line arguments, opens the store and replays the script
/// (or lists stored matches).
pub async fn run() -> Result<(), CliError> {
    // 解析命令行参数
    let config = CliConfig::parse();

    // 初始化日志系统
    init_logging(&config.log_level);

    tracing::info!("记分器启动");
    tracing::debug!("配置: {:?}", config);

    if config.dry_run {
        tracing::info!("Dry-run 模式 - 不写入数据目录");
        execute(&config, InMemoryMatchStore::new()).await?;
    } else {
        execute(&config, JsonFileMatchStore::new(&config.data_dir)?).await?;
    }

    if config.print_metrics {
        println!("{}", METRICS.export()?);
    }
    Ok(())
}

async fn execute<S: MatchStore + 'static>(config: &CliConfig, store: S) -> Result<(), CliError> {
    let (handle, worker) = ScoringActor::spawn(ScoringService::new(store));

    let outcome = match &config.script {
        Some(path) => {
            let script = load_script(path)?;
            let id = replay(&handle, script).await?;
            print_scorecard(&handle, id, config.format).await
        }
        None => list_matches(&handle, config.format).await,
    };

    // 关闭通道，等待 actor 退出
    drop(handle);
    worker.await?;
    outcome
}

/// 读取并解析脚本文件
pub fn load_script(path: &std::path::Path) -> Result<Script, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadScript {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

async fn fetch_match(handle: &ScoringHandle, match_id: MatchId) -> Result<Match, CliError> {
    match handle.execute(ScoringCommand::GetMatch { match_id }).await? {
        ScoringReply::Match(state) => Ok(*state),
        _ => Err(CliError::UnexpectedReply("get_match")),
    }
}

/// 回放脚本，返回比赛 id
pub async fn replay(handle: &ScoringHandle, script: Script) -> Result<MatchId, CliError> {
    let id = match handle
        .execute(ScoringCommand::CreateMatch { setup: script.setup })
        .await?
    {
        ScoringReply::Created(id) => id,
        _ => return Err(CliError::UnexpectedReply("create_match")),
    };

    for (index, step) in script.steps.iter().enumerate() {
        let step_no = index + 1;
        let state = fetch_match(handle, id).await?;
        let command = step
            .to_command(id, &state)
            .map_err(|source| CliError::Input { step: step_no, source })?;
        let reply = handle
            .execute(command)
            .await
            .map_err(|source| CliError::Step { step: step_no, source })?;
        report(step_no, &reply);
    }
    Ok(id)
}

fn report(step: usize, reply: &ScoringReply) {
    match reply {
        ScoringReply::Delivery(result) if result.match_completed => {
            tracing::info!(step, "第二局结束，等待确认比赛结果");
        }
        ScoringReply::Delivery(result) if result.innings_completed => {
            tracing::info!(step, "第一局结束，等待换局");
        }
        ScoringReply::Delivery(result) if result.over_completed => {
            tracing::info!(step, "本轮结束，需要更换投球手");
        }
        ScoringReply::Undo(UndoOutcome::Refused(reason)) => {
            tracing::warn!(step, %reason, "撤销被拒绝");
        }
        ScoringReply::Completed(result) => {
            tracing::info!(step, %result, "比赛结束");
        }
        _ => {}
    }
}

async fn print_scorecard(handle: &ScoringHandle, match_id: MatchId, format: OutputFormat) -> Result<(), CliError> {
    let card: Scorecard = match handle.execute(ScoringCommand::Scorecard { match_id }).await? {
        ScoringReply::Scorecard(card) => *card,
        _ => return Err(CliError::UnexpectedReply("scorecard")),
    };
    match format {
        OutputFormat::Text => print!("{}", card),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
    }
    Ok(())
}

async fn list_matches(handle: &ScoringHandle, format: OutputFormat) -> Result<(), CliError> {
    let ids = match handle.execute(ScoringCommand::ListMatches).await? {
        ScoringReply::Matches(ids) => ids,
        _ => return Err(CliError::UnexpectedReply("list_matches")),
    };

    let mut lines = Vec::with_capacity(ids.len());
    for id in ids {
        let state = fetch_match(handle, id).await?;
        lines.push((id, headline(&state)));
    }

    match format {
        OutputFormat::Text => {
            if lines.is_empty() {
                println!("没有已保存的比赛");
            }
            for (id, line) in &lines {
                println!("{}  {}", id, line);
            }
        }
        OutputFormat::Json => {
            let entries: Vec<_> = lines
                .iter()
                .map(|(id, line)| serde_json::json!({ "id": id, "headline": line }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

/// 初始化日志系统
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_default() {
        // 测试默认配置
        let config = CliConfig::parse_from(["cricket-scorer"]);
        assert_eq!(config.data_dir, PathBuf::from("matches"));
        assert!(config.script.is_none());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.print_metrics);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_cli_config_custom() {
        // 测试自定义配置
        let config = CliConfig::parse_from([
            "cricket-scorer",
            "--data-dir", "/tmp/scores",
            "--script", "demos/two_over_match.json",
            "--log-level", "debug",
            "--format", "json",
            "--print-metrics",
            "--dry-run",
        ]);

        assert_eq!(config.data_dir, PathBuf::from("/tmp/scores"));
        assert_eq!(config.script, Some(PathBuf::from("demos/two_over_match.json")));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.print_metrics);
        assert!(config.dry_run);
    }

    #[test]
    fn test_cli_config_short_flags() {
        // 测试短参数
        let config = CliConfig::parse_from(["cricket-scorer", "-d", "data", "-s", "game.json", "-l", "warn", "-f", "json"]);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.script, Some(PathBuf::from("game.json")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_bad_log_level_rejected() {
        assert!(CliConfig::try_parse_from(["cricket-scorer", "--log-level", "loud"]).is_err());
    }

    #[tokio::test]
    async fn test_replay_demo_script() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/two_over_match.json");
        let script = load_script(&path).unwrap();
        let (handle, worker) = ScoringActor::spawn(ScoringService::new(InMemoryMatchStore::new()));

        let id = replay(&handle, script).await.unwrap();
        let state = fetch_match(&handle, id).await.unwrap();
        assert!(state.completed);
        assert!(!state.result.is_empty());

        drop(handle);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_incomplete_step_is_reported_before_engine() {
        let script: Script = serde_json::from_str(
            r#"{
                "match": { "overs": 1, "team_size": 3, "teams": [
                    { "name": "Lions", "players": ["Asha", "Ben", "Cal"] },
                    { "name": "Tigers", "players": ["Dev", "Eli", "Fay"] } ] },
                "steps": [
                    { "step": "start", "batting_first": "Lions", "striker": "Asha", "non_striker": "Ben", "bowler": "Dev" },
                    { "step": "wicket", "how": "caught", "next": "Cal" }
                ]
            }"#,
        )
        .unwrap();
        let (handle, _worker) = ScoringActor::spawn(ScoringService::new(InMemoryMatchStore::new()));
        let err = replay(&handle, script).await.unwrap_err();
        assert!(matches!(
            err,
            CliError::Input { step: 2, source: StepError::Incomplete("fielder") }
        ));
    }
}
