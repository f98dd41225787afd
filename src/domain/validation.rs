/// Match Validator - Creation Rule Validation
///
/// This module validates match definitions before a match is created, so
/// the scoring engine only ever sees well-formed teams.
///
/// ## Validation Rules
/// - Overs must be within the configured range
/// - Team size must be within the configured range
/// - Each team must name exactly `team_size` players
/// - Team and player names must not be empty
/// - Team names must differ, as must player names within a team
///
/// ## Usage
/// ```rust,ignore
/// use cricket_scorer::domain::validation::MatchValidator;
///
/// let validator = MatchValidator::new();
/// match validator.validate(&setup) {
///     Ok(()) => println!("Match is valid"),
///     Err(e) => println!("Validation error: {}", e),
/// }
/// ```

use crate::domain::match_state::{MatchSetup, TeamSetup};
use std::collections::HashSet;
use thiserror::Error;

/// Validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Overs outside the allowed range
    #[error("Overs out of range: {0}")]
    OversOutOfRange(String),

    /// Team size outside the allowed range
    #[error("Team size out of range: {0}")]
    TeamSizeOutOfRange(String),

    /// A team names the wrong number of players
    #[error("Wrong number of players: {0}")]
    WrongPlayerCount(String),

    /// Team name is empty or clashes with the other team
    #[error("Invalid team name: {0}")]
    InvalidTeamName(String),

    /// Player name is empty or repeated within a team
    #[error("Invalid player name: {0}")]
    InvalidPlayerName(String),
}

/// Match validation configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Minimum overs per innings (inclusive)
    pub min_overs: u32,

    /// Maximum overs per innings (inclusive)
    pub max_overs: u32,

    /// Minimum players per team (inclusive)
    pub min_team_size: u32,

    /// Maximum players per team (inclusive)
    pub max_team_size: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_overs: 1,
            max_overs: 90,
            min_team_size: 2,
            max_team_size: 11,
        }
    }
}

/// Match validator
///
/// Validates match definitions according to the configured limits.
#[derive(Debug, Clone, Default)]
pub struct MatchValidator {
    config: ValidationConfig,
}

impl MatchValidator {
    /// Creates a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new validator with custom configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validates a match definition
    ///
    /// # Returns
    /// * `Ok(())` if the match can be created
    /// * `Err(ValidationError)` naming the first rule that failed
    pub fn validate(&self, setup: &MatchSetup) -> Result<(), ValidationError> {
        self.validate_overs(setup.overs)?;
        self.validate_team_size(setup.team_size)?;

        for team in &setup.teams {
            self.validate_team(team, setup.team_size)?;
        }

        let [first, second] = &setup.teams;
        if first.name.trim().eq_ignore_ascii_case(second.name.trim()) {
            return Err(ValidationError::InvalidTeamName(format!(
                "Both teams are named '{}'",
                first.name.trim()
            )));
        }

        Ok(())
    }

    fn validate_overs(&self, overs: u32) -> Result<(), ValidationError> {
        if overs < self.config.min_overs || overs > self.config.max_overs {
            return Err(ValidationError::OversOutOfRange(format!(
                "{} is not between {} and {}",
                overs, self.config.min_overs, self.config.max_overs
            )));
        }
        Ok(())
    }

    fn validate_team_size(&self, team_size: u32) -> Result<(), ValidationError> {
        if team_size < self.config.min_team_size || team_size > self.config.max_team_size {
            return Err(ValidationError::TeamSizeOutOfRange(format!(
                "{} is not between {} and {}",
                team_size, self.config.min_team_size, self.config.max_team_size
            )));
        }
        Ok(())
    }

    fn validate_team(&self, team: &TeamSetup, team_size: u32) -> Result<(), ValidationError> {
        let name = team.name.trim();
        if name.is_empty() {
            return Err(ValidationError::InvalidTeamName(
                "Team name cannot be empty".to_string(),
            ));
        }

        if team.players.len() != team_size as usize {
            return Err(ValidationError::WrongPlayerCount(format!(
                "'{}' has {} players, expected {}",
                name,
                team.players.len(),
                team_size
            )));
        }

        let mut seen = HashSet::new();
        for player in &team.players {
            let player = player.trim();
            if player.is_empty() {
                return Err(ValidationError::InvalidPlayerName(format!(
                    "'{}' has a player with an empty name",
                    name
                )));
            }
            if !seen.insert(player.to_ascii_lowercase()) {
                return Err(ValidationError::InvalidPlayerName(format!(
                    "'{}' lists '{}' more than once",
                    name, player
                )));
            }
        }

        Ok(())
    }
}
