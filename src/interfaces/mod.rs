/// Interfaces Layer - External Entry Points
///
/// This layer contains the external interfaces to the system.
///
/// ## Modules
/// - `cli`: Command-line interface (main.rs logic) and scoring scripts

pub mod cli;
