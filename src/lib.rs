//! Ball-by-ball cricket scoring engine
//!
//! Layers, inner to outer:
//! - `shared`: identifiers and metrics
//! - `domain`: cricket rules, the match aggregate, scorecards
//! - `application`: the scoring service and its actor
//! - `infrastructure`: match stores
//! - `interfaces`: the command-line runner

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;
