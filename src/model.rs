use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Upper bound on roster size for a team.
pub const MAX_TEAM_SIZE: usize = 6;

/// Key used for effectiveness lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        CategoryId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        CategoryId(value.to_string())
    }
}

impl From<u32> for CategoryId {
    fn from(value: u32) -> Self {
        CategoryId(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub power: u32,
    pub life: u32,
    /// Either a category display name ("Fire") or its stored id ("1").
    #[serde(alias = "type")]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "pokemon")]
    pub creatures: Vec<Creature>,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>, creatures: Vec<Creature>) -> Self {
        Team {
            id: id.into(),
            name: name.into(),
            creatures,
        }
    }

    /// Sum of member powers. Display only; the engine never reads it.
    pub fn power(&self) -> u32 {
        self.creatures.iter().map(|c| c.power).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectivenessEntry {
    pub attacking: CategoryId,
    pub defending: CategoryId,
    pub factor: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub effectiveness: Vec<EffectivenessEntry>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(flatten, default)]
    pub extras: HashMap<String, serde_json::Value>,
}
