//! Error types shared across the crate.
//!
//! None of these ever escape [`crate::battle::simulate_battle`]: lookup
//! failures are recovered inside the engine, and validation errors are meant
//! for callers that check input before starting a battle.

use thiserror::Error;

/// Failure reported by an external lookup collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The backing store could not be reached.
    #[error("lookup source unavailable: {0}")]
    Unavailable(String),

    /// The backing store answered with data that could not be used.
    #[error("malformed lookup response: {0}")]
    Malformed(String),
}

/// Input rejected before a battle is started.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("team '{0}' has no creatures")]
    EmptyRoster(String),

    #[error("team '{team}' has {size} creatures, at most {max} are allowed")]
    RosterTooLarge { team: String, size: usize, max: usize },

    #[error("both sides are team '{0}', pick two different teams")]
    SameTeam(String),

    #[error("creature field '{field}': {message}")]
    Field {
        field: &'static str,
        message: &'static str,
    },
}

/// Problems found while assembling a catalog.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CatalogError {
    #[error("duplicate team id '{0}'")]
    DuplicateTeam(String),

    #[error("duplicate category id {0}")]
    DuplicateCategory(u32),

    #[error("team not found: '{0}'")]
    TeamNotFound(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
