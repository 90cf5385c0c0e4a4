//! Full dish detail view.
//!
//! [`render_detail`] produces the fragment shown inside the dish modal and on
//! the generated `dishes/{id}.html` pages. Layout:
//!
//! ```text
//! div.dish-detail
//! ├── header   image (or upload placeholder), category, name, price,
//! │            prep time, serving, spice, lead
//! ├── body     description, ingredients, nutrition, wine pairings,
//! │            dietary info, chef's notes, origin
//! ├── aside    "You may also like" (recommendations, when any)
//! └── footer   add to order, share, favorite, back to menu
//! ```
//!
//! Every footer control is a `data-action` hook; see
//! [`crate::shell::Subscriptions`] for where they land.

use crate::catalog::{Catalog, DishRecord};
use crate::components::{self, ButtonSpec, ButtonVariant, Icon, safe_src};
use maud::{Markup, html};

/// Fragment shown when the requested dish does not exist.
pub fn not_found() -> Markup {
    html! {
        div.dish-detail-error { "Dish not found" }
    }
}

/// Render the detail view for `id`, or the not-found fragment.
///
/// `link_prefix` leads back to the site root from wherever the fragment is
/// placed: `""` inside the index document, `"../"` on a dish page.
pub fn render_detail(catalog: &Catalog, id: &str, link_prefix: &str) -> Markup {
    let Ok(dish) = catalog.get(id) else {
        return not_found();
    };
    let recommended = catalog.recommend(id);

    html! {
        div.dish-detail data-dish=(dish.id) {
            (header(dish))
            (body(dish))
            @if !recommended.is_empty() {
                aside.dish-recommendations {
                    h3 { "You may also like" }
                    div.recommendation-grid {
                        @for other in &recommended {
                            (components::dish_card(other))
                        }
                    }
                }
            }
            (footer(dish, link_prefix))
        }
    }
}

fn header(dish: &DishRecord) -> Markup {
    let image = dish.image.as_deref().and_then(safe_src);
    html! {
        div.dish-detail-header {
            div.dish-detail-image {
                @if let Some(src) = image {
                    img src=(src) alt=(dish.name);
                } @else {
                    div.image-placeholder
                        data-action="upload-image"
                        data-target=(dish.id)
                        title="Upload a photo" {
                        (Icon::Plate)
                    }
                }
            }
            div.dish-detail-info {
                div.dish-category { (dish.category) }
                h1.dish-detail-name { (dish.name) }
                div.dish-meta {
                    span.dish-price { (dish.price_label()) }
                    span.dish-time { (Icon::Clock) " " (dish.preparation_time) }
                    span.dish-serving { (Icon::People) " " (dish.serving_size) }
                    span.dish-spice { (Icon::Chili) " " (dish.spice_level) }
                }
                p.lead { (dish.short_description) }
            }
        }
    }
}

fn body(dish: &DishRecord) -> Markup {
    let allergens = if dish.allergens.is_empty() {
        "None".to_string()
    } else {
        dish.allergens.join(", ")
    };
    html! {
        div.dish-detail-body {
            div.dish-description {
                h2 { "Description" }
                p { (dish.full_description) }
            }
            div.dish-sections {
                div.dish-section {
                    h3 { "Premium Ingredients" }
                    ul.ingredients-list {
                        @for ingredient in &dish.ingredients {
                            li { (ingredient) }
                        }
                    }
                }
                div.dish-section {
                    h3 { "Nutritional Information" }
                    div.nutrition-grid {
                        @for (label, value) in dish.nutrition.rows() {
                            div.nutrition-item {
                                span.nutrition-label { (label) }
                                span.nutrition-value { (value) }
                            }
                        }
                    }
                }
                @if !dish.wine_pairings.is_empty() {
                    div.dish-section {
                        h3 { "Wine Pairings" }
                        ul.pairing-list {
                            @for pairing in &dish.wine_pairings {
                                li { (pairing) }
                            }
                        }
                    }
                }
                div.dish-section {
                    h3 { "Dietary Information" }
                    div.dietary-info {
                        div.allergens { strong { "Allergens:" } " " (allergens) }
                        div.dietary-options { strong { "Options:" } " " (dish.dietary_options.join(", ")) }
                    }
                }
                div.dish-section.chef-section {
                    h3 { "Chef's Notes" }
                    div.chef-notes { p { em { "\u{201c}" (dish.chef_notes) "\u{201d}" } } }
                }
                div.dish-section.origin-section {
                    h3 { "Origin & Tradition" }
                    div.dish-origin { p { (dish.origin) } }
                }
            }
        }
    }
}

fn footer(dish: &DishRecord, link_prefix: &str) -> Markup {
    let order = ButtonSpec::new("Add to Order").action("add-to-order", &dish.id);
    let share = ButtonSpec {
        variant: ButtonVariant::Outline,
        icon: Some(Icon::Share),
        ..ButtonSpec::new("Share Dish").action("share-dish", &dish.id)
    };
    let favorite = ButtonSpec {
        variant: ButtonVariant::Secondary,
        icon: Some(Icon::Heart),
        ..ButtonSpec::new("Save to Favorites").action("toggle-favorite", &dish.id)
    };
    html! {
        div.dish-detail-footer {
            div.dish-actions {
                (components::button(&order))
                (components::button(&share))
                (components::button(&favorite))
                a.btn.btn-ghost.btn-md href={ (link_prefix) "index.html#menu" } data-action="back-to-menu" data-target="menu" {
                    "\u{2190} Back to Menu"
                }
            }
        }
    }
}
