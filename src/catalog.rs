//! File-backed stand-in for the creature, team and category collaborators.

use crate::category::{default_directory, CategoryDirectory, CategoryResolver};
use crate::effectiveness::{EffectivenessTable, MapEffectivenessTable, StandardChart};
use crate::error::{CatalogError, LookupError};
use crate::model::{CatalogFile, CategoryId, Team};
use crate::validate::validate_roster;
use anyhow::Context;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Effectiveness source picked for a catalog.
#[derive(Debug, Clone)]
pub enum CatalogTable {
    Explicit(MapEffectivenessTable),
    /// Standard chart addressed through the catalog's own category ids.
    Standard {
        chart: StandardChart,
        categories: CategoryDirectory,
    },
}

impl CatalogTable {
    fn chart_id(categories: &CategoryDirectory, id: &CategoryId) -> Result<CategoryId, LookupError> {
        Ok(categories
            .name_by_id(id)?
            .map(CategoryId::new)
            .unwrap_or_else(|| id.clone()))
    }
}

impl EffectivenessTable for CatalogTable {
    fn lookup(
        &self,
        attacking: &CategoryId,
        defending: &CategoryId,
    ) -> Result<Option<f64>, LookupError> {
        match self {
            CatalogTable::Explicit(table) => table.lookup(attacking, defending),
            CatalogTable::Standard { chart, categories } => {
                let attacking = Self::chart_id(categories, attacking)?;
                let defending = Self::chart_id(categories, defending)?;
                chart.lookup(&attacking, &defending)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub categories: CategoryDirectory,
    pub effectiveness: CatalogTable,
    pub teams: Vec<Team>,
}

impl Catalog {
    /// Builds a catalog, filling in the built-in categories and chart when
    /// the file leaves them out.
    pub fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let mut category_ids = HashSet::new();
        for category in &file.categories {
            if !category_ids.insert(category.id) {
                return Err(CatalogError::DuplicateCategory(category.id));
            }
        }
        let mut team_ids = HashSet::new();
        for team in &file.teams {
            if !team_ids.insert(team.id.as_str()) {
                return Err(CatalogError::DuplicateTeam(team.id.clone()));
            }
            validate_roster(team)?;
        }

        let categories = if file.categories.is_empty() {
            debug!("catalog has no categories, using built-in list");
            default_directory()
        } else {
            CategoryDirectory::new(file.categories)
        };
        let effectiveness = if file.effectiveness.is_empty() {
            debug!("catalog has no effectiveness entries, using standard chart");
            CatalogTable::Standard {
                chart: StandardChart,
                categories: categories.clone(),
            }
        } else {
            CatalogTable::Explicit(MapEffectivenessTable::from_entries(&file.effectiveness))
        };
        Ok(Catalog {
            categories,
            effectiveness,
            teams: file.teams,
        })
    }

    pub fn team(&self, id: &str) -> Result<&Team, CatalogError> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CatalogError::TeamNotFound(id.to_string()))
    }
}

pub fn parse_catalog(raw: &str) -> anyhow::Result<Catalog> {
    let file: CatalogFile = serde_json::from_str(raw).context("Failed to parse catalog JSON")?;
    Ok(Catalog::from_file(file)?)
}

pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog at {}", path.display()))?;
    let catalog =
        parse_catalog(&raw).with_context(|| format!("Invalid catalog {}", path.display()))?;
    info!(
        path = %path.display(),
        teams = catalog.teams.len(),
        categories = catalog.categories.categories().len(),
        "catalog loaded"
    );
    Ok(catalog)
}
