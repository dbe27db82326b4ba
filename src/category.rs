//! Category name/id resolution.

use crate::error::LookupError;
use crate::model::{Category, CategoryId};
use phf::phf_map;
use tracing::warn;

/// Display name used when an id cannot be resolved.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Fallback categories, used when no catalog supplies its own list.
static DEFAULT_CATEGORIES: phf::Map<&'static str, u32> = phf_map! {
    "fire" => 1,
    "water" => 2,
    "grass" => 3,
    "electric" => 4,
    "psychic" => 5,
    "ice" => 6,
    "dragon" => 7,
    "dark" => 8,
    "fighting" => 9,
    "poison" => 10,
    "ground" => 11,
    "flying" => 12,
    "bug" => 13,
    "rock" => 14,
    "ghost" => 15,
    "steel" => 16,
    "normal" => 17,
    "fairy" => 18,
};

/// Resolves category display names to stored ids and back.
pub trait CategoryResolver {
    fn id_by_name(&self, name: &str) -> Result<Option<CategoryId>, LookupError>;
    fn name_by_id(&self, id: &CategoryId) -> Result<Option<String>, LookupError>;
}

impl<R: CategoryResolver + ?Sized> CategoryResolver for &R {
    fn id_by_name(&self, name: &str) -> Result<Option<CategoryId>, LookupError> {
        (**self).id_by_name(name)
    }

    fn name_by_id(&self, id: &CategoryId) -> Result<Option<String>, LookupError> {
        (**self).name_by_id(id)
    }
}

/// In-memory category list.
#[derive(Debug, Clone, Default)]
pub struct CategoryDirectory {
    categories: Vec<Category>,
}

impl CategoryDirectory {
    pub fn new(categories: Vec<Category>) -> Self {
        CategoryDirectory { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl CategoryResolver for CategoryDirectory {
    fn id_by_name(&self, name: &str) -> Result<Option<CategoryId>, LookupError> {
        let name = name.trim();
        Ok(self
            .categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| CategoryId::from(c.id)))
    }

    fn name_by_id(&self, id: &CategoryId) -> Result<Option<String>, LookupError> {
        Ok(self
            .categories
            .iter()
            .find(|c| c.id.to_string() == id.as_str())
            .map(|c| c.name.clone()))
    }
}

/// Directory holding the built-in fallback categories, ordered by id.
pub fn default_directory() -> CategoryDirectory {
    let mut categories: Vec<Category> = DEFAULT_CATEGORIES
        .entries()
        .map(|(name, id)| Category {
            id: *id,
            name: capitalize(name),
        })
        .collect();
    categories.sort_by_key(|c| c.id);
    CategoryDirectory::new(categories)
}

/// Lowercase name of a built-in category id, if it is one.
pub fn default_category_name(id: &CategoryId) -> Option<&'static str> {
    DEFAULT_CATEGORIES
        .entries()
        .find(|(_, v)| v.to_string() == id.as_str())
        .map(|(name, _)| *name)
}

/// Maps a creature's raw category to the key used for effectiveness lookups.
///
/// Names are resolved through `resolver`; anything it does not recognise is
/// taken to be an id already and passed through unchanged.
pub fn resolve_category_id<R: CategoryResolver + ?Sized>(resolver: &R, raw: &str) -> CategoryId {
    match resolver.id_by_name(raw) {
        Ok(Some(id)) => id,
        Ok(None) => CategoryId::new(raw.trim()),
        Err(err) => {
            warn!(category = raw, error = %err, "category lookup failed, using raw value as id");
            CategoryId::new(raw.trim())
        }
    }
}

/// Display name for a category id, `"Unknown"` when it cannot be resolved.
pub fn category_display_name<R: CategoryResolver + ?Sized>(resolver: &R, id: &CategoryId) -> String {
    match resolver.name_by_id(id) {
        Ok(Some(name)) => name,
        Ok(None) => UNKNOWN_CATEGORY.to_string(),
        Err(err) => {
            warn!(category_id = %id, error = %err, "category name lookup failed");
            UNKNOWN_CATEGORY.to_string()
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
