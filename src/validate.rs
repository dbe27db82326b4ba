//! Checks a caller runs before starting a battle.

use crate::error::ValidationError;
use crate::model::{Creature, Team, MAX_TEAM_SIZE};

pub const MIN_POWER: u32 = 10;
pub const MAX_POWER: u32 = 100;

pub fn validate_roster(team: &Team) -> Result<(), ValidationError> {
    if team.creatures.is_empty() {
        return Err(ValidationError::EmptyRoster(team.id.clone()));
    }
    if team.creatures.len() > MAX_TEAM_SIZE {
        return Err(ValidationError::RosterTooLarge {
            team: team.id.clone(),
            size: team.creatures.len(),
            max: MAX_TEAM_SIZE,
        });
    }
    Ok(())
}

/// Both rosters must be usable and the two sides must be different teams.
pub fn validate_matchup(team1: &Team, team2: &Team) -> Result<(), ValidationError> {
    if team1.id == team2.id {
        return Err(ValidationError::SameTeam(team1.id.clone()));
    }
    validate_roster(team1)?;
    validate_roster(team2)
}

/// Every problem with a creature's fields, empty when it is valid.
pub fn validate_creature(creature: &Creature) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if creature.name.trim().is_empty() {
        errors.push(field_error("name", "name is required"));
    }
    if creature.category.trim().is_empty() {
        errors.push(field_error("category", "category is required"));
    }
    if creature.power == 0 {
        errors.push(field_error("power", "power is required"));
    } else if !(MIN_POWER..=MAX_POWER).contains(&creature.power) {
        errors.push(field_error("power", "power must be between 10 and 100"));
    }
    if creature.life < 1 {
        errors.push(field_error("life", "life must be greater than 0"));
    }
    if creature.image.trim().is_empty() {
        errors.push(field_error("image", "image URL is required"));
    }
    errors
}

fn field_error(field: &'static str, message: &'static str) -> ValidationError {
    ValidationError::Field { field, message }
}
