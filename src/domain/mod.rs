/// Domain Layer - Core Scoring Logic
///
/// This is the heart of the scorer, containing pure cricket rules with no
/// I/O. The domain layer is framework-agnostic and can be tested in
/// isolation.
///
/// ## Modules
/// - `entities`: Player, Team, Delivery
/// - `outcome`: the closed set of delivery outcomes and their log codes
/// - `match_state`: the Match aggregate and its role pointers
/// - `scoring`: engine, over/innings progression, undo
/// - `validation`: match creation rules
/// - `summary`: scorecard figures
///
/// ## Principles
/// 1. **Pure Business Logic**: No I/O, no frameworks, no infrastructure
/// 2. **Validate, then mutate**: a refused operation leaves the match untouched
/// 3. **Testable**: Easy to unit test without mocks

pub mod entities;
pub mod errors;
pub mod match_state;
pub mod outcome;
pub mod scoring;
pub mod summary;
pub mod validation;

// Re-export key types
pub use entities::{Delivery, Player, Team};
pub use errors::{ScoringError, UndoRefusal};
pub use match_state::{Match, MatchSetup, PendingAction, TeamSetup, TeamSide};
pub use outcome::{DeliveryCode, Dismissal, DismissalMode, Outcome, RunOutBall};
pub use scoring::{DeliveryResult, ScoringEngine};
pub use summary::Scorecard;
pub use validation::{MatchValidator, ValidationConfig, ValidationError};
