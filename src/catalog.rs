//! Dish catalog: the fixed set of dishes served on the menu.
//!
//! The catalog is built once per session, either from the bundled
//! `static/dishes.json` or from a user-supplied JSON file with the same
//! shape, and is read-only afterwards. Records keep their definition order;
//! every query returns dishes in that order.
//!
//! ## Queries
//!
//! | Query | Semantics |
//! |-------|-----------|
//! | [`Catalog::get`] | exact id lookup |
//! | [`Catalog::by_category`] | case-sensitive category match |
//! | [`Catalog::search`] | case-insensitive substring over name, full description and ingredients |
//! | [`Catalog::recommend`] | same category OR price within [`RECOMMEND_PRICE_WINDOW`], first [`RECOMMEND_LIMIT`] |
//!
//! None of the queries rank their results. The catalog is small enough that a
//! linear scan is the whole index.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Maximum number of dishes returned by [`Catalog::recommend`].
pub const RECOMMEND_LIMIT: usize = 3;

/// Largest absolute price difference that still counts as "similar price".
pub const RECOMMEND_PRICE_WINDOW: f64 = 10.0;

const BUILTIN_DISHES: &str = include_str!("../static/dishes.json");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Dish not found: {0}")]
    NotFound(String),
    #[error("Duplicate dish id: {0}")]
    DuplicateId(String),
    #[error("Invalid dish record {id:?}: {reason}")]
    InvalidRecord { id: String, reason: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How hot a dish is. Ordered: `Mild < Medium < Hot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiceLevel {
    Mild,
    Medium,
    Hot,
}

impl SpiceLevel {
    pub fn label(self) -> &'static str {
        match self {
            SpiceLevel::Mild => "Mild",
            SpiceLevel::Medium => "Medium",
            SpiceLevel::Hot => "Hot",
        }
    }
}

impl fmt::Display for SpiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-serving nutrition facts. Macros are kept as text with their unit
/// (`"38g"`, `"1200mg"`) exactly as the kitchen writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NutritionInfo {
    pub calories: u32,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub fiber: String,
    pub sodium: String,
}

impl NutritionInfo {
    /// Label/value rows in display order: calories, protein, carbs, fat,
    /// fiber, sodium.
    pub fn rows(&self) -> [(&'static str, String); 6] {
        [
            ("Calories", self.calories.to_string()),
            ("Protein", self.protein.clone()),
            ("Carbs", self.carbs.clone()),
            ("Fat", self.fat.clone()),
            ("Fiber", self.fiber.clone()),
            ("Sodium", self.sodium.clone()),
        ]
    }
}

/// A single dish on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DishRecord {
    /// Unique identifier of ASCII letters, digits and `-`
    /// (`cazuela-de-mariscos`). It names the dish's page file.
    pub id: String,
    pub name: String,
    pub category: String,
    /// Positive price in whole currency units.
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Free-text range, e.g. `"25-30 minutes"`.
    pub preparation_time: String,
    /// Free-text range, e.g. `"2-3 people"`.
    pub serving_size: String,
    pub spice_level: SpiceLevel,
    pub short_description: String,
    pub full_description: String,
    pub ingredients: Vec<String>,
    pub nutrition: NutritionInfo,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub dietary_options: Vec<String>,
    #[serde(default)]
    pub wine_pairings: Vec<String>,
    pub chef_notes: String,
    pub origin: String,
}

impl DishRecord {
    /// Price formatted for display: `$45`, or `$12.50` for fractional prices.
    pub fn price_label(&self) -> String {
        format_price(self.price)
    }

    fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.full_description.to_lowercase().contains(needle)
            || self
                .ingredients
                .iter()
                .any(|i| i.to_lowercase().contains(needle))
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidRecord {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if !is_valid_id(&self.id) {
            return Err(invalid("id may only contain ASCII letters, digits and '-'"));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(invalid("price must be a positive number"));
        }
        Ok(())
    }
}

/// Ids double as file and URL path segments.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${:.0}", price)
    } else {
        format!("${:.2}", price)
    }
}

/// The closed set of dishes for a session.
#[derive(Debug, Clone)]
pub struct Catalog {
    dishes: Vec<DishRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and malformed records.
    pub fn new(dishes: Vec<DishRecord>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(dishes.len());
        for (pos, dish) in dishes.iter().enumerate() {
            dish.validate()?;
            if index.insert(dish.id.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateId(dish.id.clone()));
            }
        }
        Ok(Self { dishes, index })
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_DISHES)
    }

    /// Parse a JSON array of dish records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let dishes: Vec<DishRecord> = serde_json::from_str(json)?;
        Self::new(dishes)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&DishRecord, CatalogError> {
        self.index
            .get(id)
            .map(|&pos| &self.dishes[pos])
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All dishes in definition order.
    pub fn all(&self) -> &[DishRecord] {
        &self.dishes
    }

    pub fn by_category(&self, category: &str) -> Vec<&DishRecord> {
        self.dishes
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for dish in &self.dishes {
            if !seen.contains(&dish.category.as_str()) {
                seen.push(&dish.category);
            }
        }
        seen
    }

    /// Case-insensitive substring search. An empty query matches every dish.
    pub fn search(&self, query: &str) -> Vec<&DishRecord> {
        let needle = query.to_lowercase();
        self.dishes
            .iter()
            .filter(|d| d.matches_query(&needle))
            .collect()
    }

    /// Dishes to suggest alongside `id`.
    ///
    /// A dish qualifies when it shares the source's category or its price is
    /// within [`RECOMMEND_PRICE_WINDOW`]; the first [`RECOMMEND_LIMIT`]
    /// qualifying dishes in catalog order are returned. Unknown ids yield an
    /// empty list.
    pub fn recommend(&self, id: &str) -> Vec<&DishRecord> {
        let Ok(source) = self.get(id) else {
            return Vec::new();
        };
        self.dishes
            .iter()
            .filter(|d| {
                d.id != source.id
                    && (d.category == source.category
                        || (d.price - source.price).abs() <= RECOMMEND_PRICE_WINDOW)
            })
            .take(RECOMMEND_LIMIT)
            .collect()
    }
}
