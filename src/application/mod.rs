/// Application Layer - Services and Commands
///
/// This layer orchestrates domain logic to implement the scorer's
/// operations. It depends on the domain layer and reaches persistence only
/// through the injected `MatchStore`.
///
/// ## Modules
/// - `services`: ScoringService (per-operation orchestration) and ScoringActor
/// - `dto`: commands and replies for the actor
/// - `error`: ServiceError

pub mod dto;
pub mod error;
pub mod services;

// Re-export key services
pub use dto::{ScoringCommand, ScoringReply, UndoOutcome};
pub use error::ServiceError;
pub use services::{ScoringActor, ScoringHandle, ScoringService};
