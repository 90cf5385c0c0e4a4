//! Shared test utilities for the ivory-site unit tests.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = Catalog::new(vec![dish("a", "Grill", 10.0)]).unwrap();
//! assert_eq!(dish_ids(catalog.by_category("Grill")), vec!["a"]);
//! ```

use crate::catalog::{Catalog, DishRecord, NutritionInfo, SpiceLevel};

// =========================================================================
// Fixtures
// =========================================================================

/// A complete, plain dish record. Tests mutate the fields they care about.
///
/// Text fields are derived from `id` and never contain words the built-in
/// menu is searched for in tests.
pub fn dish(id: &str, category: &str, price: f64) -> DishRecord {
    DishRecord {
        id: id.to_string(),
        name: format!("Test Dish {id}"),
        category: category.to_string(),
        price,
        image: None,
        preparation_time: "10-15 minutes".to_string(),
        serving_size: "1 person".to_string(),
        spice_level: SpiceLevel::Mild,
        short_description: format!("Short description of {id}"),
        full_description: format!("Full description of {id}"),
        ingredients: vec!["Rice".to_string(), "Salt".to_string()],
        nutrition: NutritionInfo {
            calories: 200,
            protein: "5g".to_string(),
            carbs: "40g".to_string(),
            fat: "2g".to_string(),
            fiber: "1g".to_string(),
            sodium: "300mg".to_string(),
        },
        allergens: vec!["Gluten".to_string()],
        dietary_options: vec!["Vegetarian".to_string()],
        wine_pairings: vec!["House White".to_string()],
        chef_notes: "Serve warm.".to_string(),
        origin: "Test kitchen".to_string(),
    }
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// Ids of `dishes` in iteration order.
pub fn dish_ids<'a>(dishes: impl IntoIterator<Item = &'a DishRecord>) -> Vec<&'a str> {
    dishes.into_iter().map(|d| d.id.as_str()).collect()
}

/// Find a dish by id. Panics with the available ids if not found.
pub fn find_dish<'a>(catalog: &'a Catalog, id: &str) -> &'a DishRecord {
    catalog.get(id).unwrap_or_else(|_| {
        let ids = dish_ids(catalog.all());
        panic!("dish '{id}' not found. Available: {ids:?}")
    })
}
