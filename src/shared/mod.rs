//! Shared utilities and types used across all layers
//!
//! This module contains:
//! - Identifiers (match ids, player ids)
//! - Prometheus metrics

pub mod ids;
pub mod metrics;

// Re-export commonly used types
pub use ids::{MatchId, PlayerId};
pub use metrics::METRICS;
