/// Application Services
///
/// - `ScoringService`: owns the matches in play and the store, one
///   synchronous call per operation
/// - `ScoringActor`: runs a service on its own thread and serialises
///   commands arriving over a channel

pub mod scoring_actor;
pub mod scoring_service;

pub use scoring_actor::{ScoringActor, ScoringHandle};
pub use scoring_service::ScoringService;
