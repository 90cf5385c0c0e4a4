//! CLI output formatting.
//!
//! # Entity Display Contract
//!
//! Every dish is shown the same way in every command:
//!
//! 1. **Header line**: positional index, name, price
//! 2. **Context lines**: indented `Id:` and a one-line description
//!
//! [`dish_lines`] enforces this so `list`, `search`, `recommend` and
//! `favorites` read alike.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Seafood Specialties
//! 001 Cazuela de Mariscos Ivory  $45
//!     Id: cazuela-de-mariscos
//!     Premium seafood casserole with coastal spices
//!
//! 6 dishes in 6 categories
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 Cazuela de Mariscos Ivory → dishes/cazuela-de-mariscos.html
//!
//! Generated 1 shell page, 6 dish pages in dist
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::{Catalog, DishRecord};
use crate::favorites::FavoriteChange;
use crate::generate::{DISH_PAGE_DIR, GenerateReport};
use std::collections::BTreeSet;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Header plus context lines for one dish.
///
/// ```text
/// 001 Ceviche Tropical Ivory  $32
///     Id: ceviche-tropical
///     Fresh seafood marinated in tropical citrus
/// ```
fn dish_lines(index: usize, dish: &DishRecord) -> Vec<String> {
    vec![
        format!("{} {}  {}", format_index(index), dish.name, dish.price_label()),
        format!("{}Id: {}", indent(1), dish.id),
        format!("{}{}", indent(1), truncate_desc(&dish.short_description, 72)),
    ]
}

// ============================================================================
// list
// ============================================================================

/// Dishes grouped by category, in catalog order. With `category`, only that
/// group is shown.
pub fn format_catalog(catalog: &Catalog, category: Option<&str>) -> Vec<String> {
    let categories: Vec<&str> = match category {
        Some(c) => vec![c],
        None => catalog.categories(),
    };

    let mut lines = Vec::new();
    let mut index = 0;
    for name in &categories {
        let dishes = catalog.by_category(name);
        if dishes.is_empty() {
            continue;
        }
        lines.push(name.to_string());
        for dish in dishes {
            index += 1;
            lines.extend(dish_lines(index, dish));
        }
        lines.push(String::new());
    }

    if index == 0 {
        match category {
            Some(c) => lines.push(format!("No dishes in category \"{c}\"")),
            None => lines.push("Catalog is empty".to_string()),
        }
    } else {
        let shown_categories = categories
            .iter()
            .filter(|c| !catalog.by_category(c).is_empty())
            .count();
        lines.push(format!(
            "{} in {}",
            plural(index, "dish", "dishes"),
            plural(shown_categories, "category", "categories")
        ));
    }
    lines
}

pub fn print_catalog(catalog: &Catalog, category: Option<&str>) {
    for line in format_catalog(catalog, category) {
        println!("{}", line);
    }
}

// ============================================================================
// show
// ============================================================================

/// Full text summary of one dish.
pub fn format_dish(dish: &DishRecord) -> Vec<String> {
    let mut lines = vec![
        format!("{}  {}", dish.name, dish.price_label()),
        format!("{}{}", indent(1), dish.category),
        format!(
            "{}{} · {} · {} spice",
            indent(1),
            dish.preparation_time,
            dish.serving_size,
            dish.spice_level
        ),
        String::new(),
        dish.full_description.clone(),
        String::new(),
        "Ingredients".to_string(),
    ];
    lines.extend(dish.ingredients.iter().map(|i| format!("{}{}", indent(1), i)));

    lines.push(String::new());
    lines.push("Nutrition".to_string());
    lines.extend(
        dish.nutrition
            .rows()
            .iter()
            .map(|(label, value)| format!("{}{}: {}", indent(1), label, value)),
    );

    if !dish.wine_pairings.is_empty() {
        lines.push(String::new());
        lines.push("Wine Pairings".to_string());
        lines.extend(dish.wine_pairings.iter().map(|p| format!("{}{}", indent(1), p)));
    }

    lines.push(String::new());
    let allergens = if dish.allergens.is_empty() {
        "None".to_string()
    } else {
        dish.allergens.join(", ")
    };
    lines.push(format!("Allergens: {}", allergens));
    if !dish.dietary_options.is_empty() {
        lines.push(format!("Options: {}", dish.dietary_options.join(", ")));
    }
    lines.push(String::new());
    lines.push(format!("Chef's notes: {}", dish.chef_notes));
    lines.push(format!("Origin: {}", dish.origin));
    lines
}

pub fn print_dish(dish: &DishRecord) {
    for line in format_dish(dish) {
        println!("{}", line);
    }
}

// ============================================================================
// search / recommend
// ============================================================================

/// A titled list of dishes, e.g. search results or recommendations.
pub fn format_dish_list(title: &str, dishes: &[&DishRecord]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        title,
        plural(dishes.len(), "dish", "dishes")
    )];
    for (i, dish) in dishes.iter().enumerate() {
        lines.extend(dish_lines(i + 1, dish));
    }
    lines
}

pub fn print_dish_list(title: &str, dishes: &[&DishRecord]) {
    for line in format_dish_list(title, dishes) {
        println!("{}", line);
    }
}

// ============================================================================
// favorites
// ============================================================================

/// Stored favorites, resolved against the catalog. Ids the catalog no
/// longer has are listed separately.
pub fn format_favorites(catalog: &Catalog, ids: &BTreeSet<String>) -> Vec<String> {
    if ids.is_empty() {
        return vec!["No favorites yet".to_string()];
    }
    let known: Vec<&DishRecord> = catalog.all().iter().filter(|d| ids.contains(&d.id)).collect();
    let mut lines = format_dish_list("Favorites", &known);
    let unknown: Vec<&String> = ids.iter().filter(|id| !catalog.contains(id)).collect();
    if !unknown.is_empty() {
        lines.push(String::new());
        lines.push("Not on the current menu".to_string());
        lines.extend(unknown.iter().map(|id| format!("{}{}", indent(1), id)));
    }
    lines
}

pub fn print_favorites(catalog: &Catalog, ids: &BTreeSet<String>) {
    for line in format_favorites(catalog, ids) {
        println!("{}", line);
    }
}

pub fn format_favorite_change(dish: &DishRecord, change: FavoriteChange) -> String {
    match change {
        FavoriteChange::Added => format!("Added {} to favorites", dish.name),
        FavoriteChange::Removed => format!("Removed {} from favorites", dish.name),
    }
}

// ============================================================================
// build
// ============================================================================

pub fn format_generate_report(catalog: &Catalog, report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut dish_index = 0;
    for page in &report.pages {
        let rel = page.display().to_string();
        if page.starts_with(DISH_PAGE_DIR) {
            dish_index += 1;
            let name = page
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|id| catalog.get(id).ok())
                .map(|d| d.name.as_str())
                .unwrap_or("(unknown dish)");
            lines.push(format!("{} {} → {}", format_index(dish_index), name, rel));
        } else {
            lines.push(format!("Home → {}", rel));
        }
    }
    lines.push(String::new());
    let shells = report.pages.len() - report.dish_pages();
    lines.push(format!(
        "Generated {}, {} in {}",
        plural(shells, "shell page", "shell pages"),
        plural(report.dish_pages(), "dish page", "dish pages"),
        report.output_dir.display()
    ));
    lines
}

pub fn print_generate_report(catalog: &Catalog, report: &GenerateReport) {
    for line in format_generate_report(catalog, report) {
        println!("{}", line);
    }
}
