/// Infrastructure Layer - Technical Implementations
///
/// This layer contains the implementations that touch the outside world.
///
/// The infrastructure layer depends on the domain layer but the domain
/// layer does not depend on infrastructure (dependency inversion).
///
/// ## Modules
/// - `persistence`: match stores (JSON files, in-memory)

pub mod persistence;

// Re-export key types
pub use persistence::{InMemoryMatchStore, JsonFileMatchStore, MatchStore, StoreError};
