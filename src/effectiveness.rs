//! Attack effectiveness between categories.

use crate::category::default_category_name;
use crate::error::LookupError;
use crate::model::{CategoryId, EffectivenessEntry};
use std::collections::HashMap;
use tracing::{error, warn};

/// Factor used whenever no usable entry exists.
pub const NEUTRAL_FACTOR: f64 = 1.0;

/// External table of multipliers keyed by (attacking, defending) category.
pub trait EffectivenessTable {
    /// `Ok(None)` means the table holds no entry for the pair.
    fn lookup(&self, attacking: &CategoryId, defending: &CategoryId)
        -> Result<Option<f64>, LookupError>;
}

impl<T: EffectivenessTable + ?Sized> EffectivenessTable for &T {
    fn lookup(
        &self,
        attacking: &CategoryId,
        defending: &CategoryId,
    ) -> Result<Option<f64>, LookupError> {
        (**self).lookup(attacking, defending)
    }
}

/// Table backed by explicit entries, typically loaded from a catalog.
#[derive(Debug, Clone, Default)]
pub struct MapEffectivenessTable {
    entries: HashMap<(CategoryId, CategoryId), f64>,
}

impl MapEffectivenessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a EffectivenessEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry.attacking.clone(), entry.defending.clone(), entry.factor);
        }
        table
    }

    /// Later inserts for the same pair replace earlier ones.
    pub fn insert(&mut self, attacking: CategoryId, defending: CategoryId, factor: f64) {
        self.entries.insert((attacking, defending), factor);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EffectivenessTable for MapEffectivenessTable {
    fn lookup(
        &self,
        attacking: &CategoryId,
        defending: &CategoryId,
    ) -> Result<Option<f64>, LookupError> {
        Ok(self
            .entries
            .get(&(attacking.clone(), defending.clone()))
            .copied())
    }
}

/// Built-in chart for the standard categories.
///
/// Accepts either built-in ids ("1" = fire) or names. Pairs involving a
/// category outside the chart report no entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChart;

impl EffectivenessTable for StandardChart {
    fn lookup(
        &self,
        attacking: &CategoryId,
        defending: &CategoryId,
    ) -> Result<Option<f64>, LookupError> {
        let atk = chart_key(attacking);
        let def = chart_key(defending);
        Ok(chart_factor(&atk, &def))
    }
}

fn chart_key(id: &CategoryId) -> String {
    default_category_name(id)
        .map(str::to_string)
        .unwrap_or_else(|| id.as_str().trim().to_ascii_lowercase())
}

fn is_charted(name: &str) -> bool {
    matches!(
        name,
        "normal"
            | "fire"
            | "water"
            | "electric"
            | "grass"
            | "ice"
            | "fighting"
            | "poison"
            | "ground"
            | "flying"
            | "psychic"
            | "bug"
            | "rock"
            | "ghost"
            | "dragon"
            | "dark"
            | "steel"
            | "fairy"
    )
}

// Ref: pokemon-showdown/sim/dex-data.ts, single-type multipliers.
fn chart_factor(atk: &str, def: &str) -> Option<f64> {
    if !is_charted(atk) || !is_charted(def) {
        return None;
    }
    let factor = match atk {
        "normal" => match def {
            "rock" | "steel" => 0.5,
            "ghost" => 0.0,
            _ => 1.0,
        },
        "fire" => match def {
            "fire" | "water" | "rock" | "dragon" => 0.5,
            "grass" | "ice" | "bug" | "steel" => 2.0,
            _ => 1.0,
        },
        "water" => match def {
            "water" | "grass" | "dragon" => 0.5,
            "fire" | "ground" | "rock" => 2.0,
            _ => 1.0,
        },
        "electric" => match def {
            "electric" | "grass" | "dragon" => 0.5,
            "water" | "flying" => 2.0,
            "ground" => 0.0,
            _ => 1.0,
        },
        "grass" => match def {
            "fire" | "grass" | "poison" | "flying" | "bug" | "dragon" | "steel" => 0.5,
            "water" | "ground" | "rock" => 2.0,
            _ => 1.0,
        },
        "ice" => match def {
            "fire" | "water" | "ice" | "steel" => 0.5,
            "grass" | "ground" | "flying" | "dragon" => 2.0,
            _ => 1.0,
        },
        "fighting" => match def {
            "normal" | "ice" | "rock" | "dark" | "steel" => 2.0,
            "poison" | "flying" | "psychic" | "bug" | "fairy" => 0.5,
            "ghost" => 0.0,
            _ => 1.0,
        },
        "poison" => match def {
            "grass" | "fairy" => 2.0,
            "poison" | "ground" | "rock" | "ghost" => 0.5,
            "steel" => 0.0,
            _ => 1.0,
        },
        "ground" => match def {
            "fire" | "electric" | "poison" | "rock" | "steel" => 2.0,
            "grass" | "bug" => 0.5,
            "flying" => 0.0,
            _ => 1.0,
        },
        "flying" => match def {
            "grass" | "fighting" | "bug" => 2.0,
            "electric" | "rock" | "steel" => 0.5,
            _ => 1.0,
        },
        "psychic" => match def {
            "fighting" | "poison" => 2.0,
            "psychic" | "steel" => 0.5,
            "dark" => 0.0,
            _ => 1.0,
        },
        "bug" => match def {
            "grass" | "psychic" | "dark" => 2.0,
            "fire" | "fighting" | "poison" | "flying" | "ghost" | "steel" | "fairy" => 0.5,
            _ => 1.0,
        },
        "rock" => match def {
            "fire" | "ice" | "flying" | "bug" => 2.0,
            "fighting" | "ground" | "steel" => 0.5,
            _ => 1.0,
        },
        "ghost" => match def {
            "ghost" | "psychic" => 2.0,
            "dark" => 0.5,
            "normal" => 0.0,
            _ => 1.0,
        },
        "dragon" => match def {
            "dragon" => 2.0,
            "steel" => 0.5,
            "fairy" => 0.0,
            _ => 1.0,
        },
        "dark" => match def {
            "psychic" | "ghost" => 2.0,
            "fighting" | "dark" | "fairy" => 0.5,
            _ => 1.0,
        },
        "steel" => match def {
            "rock" | "ice" | "fairy" => 2.0,
            "fire" | "water" | "electric" | "steel" => 0.5,
            _ => 1.0,
        },
        "fairy" => match def {
            "fighting" | "dragon" | "dark" => 2.0,
            "fire" | "poison" | "steel" => 0.5,
            _ => 1.0,
        },
        _ => 1.0,
    };
    Some(factor)
}

/// Per-simulation front for an [`EffectivenessTable`].
///
/// Every answer, including neutral fallbacks, is cached for the lifetime of
/// the resolver, so the same pair always yields the same factor and the
/// table is queried at most once per ordered pair.
pub struct EffectivenessResolver<'a, T: EffectivenessTable + ?Sized> {
    table: &'a T,
    cache: HashMap<(CategoryId, CategoryId), f64>,
}

impl<'a, T: EffectivenessTable + ?Sized> EffectivenessResolver<'a, T> {
    pub fn new(table: &'a T) -> Self {
        EffectivenessResolver {
            table,
            cache: HashMap::new(),
        }
    }

    /// Multiplier applied when `attacking` hits `defending`. Never fails.
    pub fn factor(&mut self, attacking: &CategoryId, defending: &CategoryId) -> f64 {
        let key = (attacking.clone(), defending.clone());
        if let Some(factor) = self.cache.get(&key) {
            return *factor;
        }
        let factor = effectiveness(self.table, attacking, defending);
        self.cache.insert(key, factor);
        factor
    }

    pub fn cached_pairs(&self) -> usize {
        self.cache.len()
    }
}

/// Uncached lookup with the neutral fallback applied.
pub fn effectiveness<T: EffectivenessTable + ?Sized>(
    table: &T,
    attacking: &CategoryId,
    defending: &CategoryId,
) -> f64 {
    match table.lookup(attacking, defending) {
        Ok(Some(factor)) if factor.is_finite() && factor >= 0.0 => factor,
        Ok(Some(factor)) => {
            warn!(%attacking, %defending, factor, "unusable effectiveness factor, using 1.0");
            NEUTRAL_FACTOR
        }
        Ok(None) => {
            warn!(%attacking, %defending, "no effectiveness entry, using 1.0");
            NEUTRAL_FACTOR
        }
        Err(err) => {
            error!(%attacking, %defending, error = %err, "effectiveness lookup failed, using 1.0");
            NEUTRAL_FACTOR
        }
    }
}
