//! Prometheus Metrics Module
//!
//! 记分引擎的核心指标
//!
//! ## 指标类型
//! - **Counter**: 投球总数（按类型）、撤销次数（按结果）
//! - **Counter**: 完成的 over / 局 / 比赛
//! - **Counter**: 错误总数（按类型）
//!
//! ## 使用示例
//! ```rust,ignore
//! use cricket_scorer::shared::metrics::METRICS;
//!
//! // 记录一次投球
//! METRICS.deliveries_total.with_label_values(&["runs"]).inc();
//!
//! // 导出文本格式
//! let text = METRICS.export()?;
//! ```

use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec, TextEncoder};

lazy_static! {
    /// 全局Metrics实例
    pub static ref METRICS: Metrics = Metrics::new();
}

/// 记分引擎核心指标
pub struct Metrics {
    /// 投球总数 (按类型: runs/wide/no_ball/bye/leg_bye/wicket)
    pub deliveries_total: IntCounterVec,

    /// 撤销尝试 (按结果: undone/refused)
    pub undo_total: IntCounterVec,

    /// 完成的 over 数
    pub overs_completed_total: IntCounter,

    /// 完成的局数
    pub innings_completed_total: IntCounter,

    /// 完成的比赛数
    pub matches_completed_total: IntCounter,

    /// 错误总数 (按类型)
    pub errors_total: IntCounterVec,
}

impl Metrics {
    /// 创建新的Metrics实例
    pub fn new() -> Self {
        Self {
            deliveries_total: register_int_counter_vec!(
                "cricket_scorer_deliveries_total",
                "Total number of deliveries recorded",
                &["kind"]
            )
            .expect("deliveries_total registered once"),

            undo_total: register_int_counter_vec!(
                "cricket_scorer_undo_total",
                "Total number of undo requests",
                &["result"]
            )
            .expect("undo_total registered once"),

            overs_completed_total: register_int_counter!(
                "cricket_scorer_overs_completed_total",
                "Total number of completed overs"
            )
            .expect("overs_completed_total registered once"),

            innings_completed_total: register_int_counter!(
                "cricket_scorer_innings_completed_total",
                "Total number of completed innings"
            )
            .expect("innings_completed_total registered once"),

            matches_completed_total: register_int_counter!(
                "cricket_scorer_matches_completed_total",
                "Total number of matches with a result"
            )
            .expect("matches_completed_total registered once"),

            errors_total: register_int_counter_vec!(
                "cricket_scorer_errors_total",
                "Total number of refused or failed operations",
                &["error_type"]
            )
            .expect("errors_total registered once"),
        }
    }

    /// 导出Prometheus格式的指标
    pub fn export(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        encoder.encode_to_string(&metric_families)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_global() {
        // 使用全局METRICS实例而不是创建新的
        METRICS.deliveries_total.with_label_values(&["runs"]).inc();

        let output = METRICS.export().unwrap();
        assert!(output.contains("cricket_scorer_deliveries_total"));
    }

    #[test]
    fn test_counter_global() {
        // 全局共享，不能假设值精确匹配
        let before = METRICS.overs_completed_total.get();
        METRICS.overs_completed_total.inc();
        assert!(METRICS.overs_completed_total.get() > before);
    }
}
