//! Static site generation.
//!
//! Renders the single-page shell and one standalone page per dish into an
//! output directory. The shell carries every element the controllers address
//! (page sections, nav links, the dish modal, the toast container, the menu
//! grid), so a host that loads `index.html` can drive it with an
//! [`App`](crate::shell::App).
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Navbar, page sections, modal, toasts, overlay root
//! └── dishes/
//!     ├── cazuela-de-mariscos.html
//!     └── ...                    # Detail view per dish
//! ```
//!
//! ## Page sections
//!
//! | Page | Content |
//! |------|---------|
//! | `home` | Hero with tagline, feature cards |
//! | `menu` | Search box, category filter, dish grid |
//! | `about` | Stats |
//! | `contact` | Contact cards |
//!
//! Any other configured page gets an empty titled section.
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time and inlined into every
//! page.

use crate::catalog::Catalog;
use crate::components::{
    self, ButtonSize, ButtonSpec, Content, InputSpec, Icon, ModalSize, ModalSpec,
};
use crate::config::SiteConfig;
use crate::detail;
use crate::host::{
    self, CATEGORY_FILTER, DISH_MODAL, MENU_GRID, MENU_SEARCH, NAV_HAMBURGER, NAV_MENU, NAVBAR,
    OVERLAY_ROOT, TOAST_CONTAINER,
};
use crate::shell::ALL_CATEGORIES;
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS: &str = include_str!("../static/style.css");

/// Directory (under the output root) holding per-dish pages.
pub const DISH_PAGE_DIR: &str = "dishes";

/// Path from a page under [`DISH_PAGE_DIR`] back to the site root.
const DISH_PAGE_ROOT: &str = "../";

/// What [`generate`] wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    /// Written files, relative to `output_dir`, in write order.
    pub pages: Vec<PathBuf>,
}

impl GenerateReport {
    pub fn dish_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.starts_with(DISH_PAGE_DIR))
            .count()
    }
}

pub fn generate(
    config: &SiteConfig,
    catalog: &Catalog,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let mut report = GenerateReport {
        output_dir: output_dir.to_path_buf(),
        pages: Vec::new(),
    };

    fs::create_dir_all(output_dir.join(DISH_PAGE_DIR))?;

    let index = render_index(config, catalog);
    write_page(&mut report, PathBuf::from("index.html"), index)?;

    for dish in catalog.all() {
        let page = render_dish_page(config, catalog, &dish.id);
        let rel = Path::new(DISH_PAGE_DIR).join(format!("{}.html", dish.id));
        write_page(&mut report, rel, page)?;
    }

    Ok(report)
}

fn write_page(report: &mut GenerateReport, rel: PathBuf, page: Markup) -> Result<(), GenerateError> {
    fs::write(report.output_dir.join(&rel), page.into_string())?;
    debug!(page = %rel.display(), "generated");
    report.pages.push(rel);
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Display title for a page id: `"contact"` → `"Contact"`.
pub fn page_title(page: &str) -> String {
    let mut chars = page.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders the navbar. `link_prefix` is prepended to each `#page` anchor so
/// pages outside the shell can link back into it.
pub fn render_nav(config: &SiteConfig, current: &str, link_prefix: &str) -> Markup {
    html! {
        nav.navbar id=(NAVBAR) {
            div.nav-container {
                a.nav-logo href={ (link_prefix) "#" (config.navigation.default_page) } {
                    (config.site.name)
                }
                ul.nav-menu id=(NAV_MENU) {
                    @for page in &config.navigation.pages {
                        @let is_current = page == current;
                        li.nav-item {
                            a.nav-link.active[is_current]
                                id=(host::nav_link_id(page))
                                href={ (link_prefix) "#" (page) }
                                data-action="navigate"
                                data-target=(page) {
                                (page_title(page))
                            }
                        }
                    }
                }
                button.nav-hamburger id=(NAV_HAMBURGER) type="button" data-action="toggle-menu" aria-label="Menu" {
                    span.bar {}
                    span.bar {}
                    span.bar {}
                }
            }
        }
    }
}

// ============================================================================
// Page sections
// ============================================================================

fn home_section(config: &SiteConfig) -> Markup {
    let cta = ButtonSpec {
        size: ButtonSize::Lg,
        end_icon: Some(Icon::ChevronRight),
        ..ButtonSpec::new("View Our Menu").action("navigate", "menu")
    };
    html! {
        div.hero {
            h1.hero-title { (config.site.name) }
            p.hero-subtitle { (config.site.tagline) }
            @if config.navigation.pages.iter().any(|p| p == "menu") {
                (components::button(&cta))
            }
        }
        div.features-grid {
            @for feature in &config.features {
                (components::feature_card(feature))
            }
        }
    }
}

fn menu_section(catalog: &Catalog) -> Markup {
    let search = InputSpec {
        placeholder: "Search dishes or ingredients".to_string(),
        input_type: "search".to_string(),
        ..InputSpec::new(MENU_SEARCH)
    };
    html! {
        div.section-header {
            h2 { "Our Menu" }
        }
        div.menu-controls {
            (components::input(&search))
            select.category-filter id=(CATEGORY_FILTER) name=(CATEGORY_FILTER) {
                option value=(ALL_CATEGORIES) selected { "All dishes" }
                @for category in catalog.categories() {
                    option value=(category) { (category) }
                }
            }
        }
        div.menu-grid id=(MENU_GRID) {
            (components::dish_grid(catalog.all()))
        }
    }
}

fn about_section(config: &SiteConfig) -> Markup {
    html! {
        div.section-header {
            h2 { "About " (config.site.name) }
            p { (config.site.tagline) }
        }
        div.stats-grid {
            @for stat in &config.stats {
                (components::stat_item(stat))
            }
        }
    }
}

fn contact_section(config: &SiteConfig) -> Markup {
    html! {
        div.section-header {
            h2 { "Visit Us" }
        }
        div.contact-grid {
            @for contact in &config.contacts {
                (components::contact_card(contact))
            }
        }
    }
}

fn page_section(config: &SiteConfig, catalog: &Catalog, page: &str) -> Markup {
    let body = match page {
        "home" => home_section(config),
        "menu" => menu_section(catalog),
        "about" => about_section(config),
        "contact" => contact_section(config),
        other => html! {
            div.section-header { h2 { (page_title(other)) } }
        },
    };
    let is_current = page == config.navigation.default_page;
    html! {
        section.page.active[is_current] id=(host::page_section_id(page)) {
            div.container { (body) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// The single-page shell.
pub fn render_index(config: &SiteConfig, catalog: &Catalog) -> Markup {
    let dish_modal = ModalSpec {
        id: DISH_MODAL.to_string(),
        title: "Dish Details".to_string(),
        content: Content::Markup(html! {}),
        size: Some(ModalSize::Wide),
        actions: Vec::new(),
    };
    let content = html! {
        (render_nav(config, &config.navigation.default_page, ""))
        main.pages {
            @for page in &config.navigation.pages {
                (page_section(config, catalog, page))
            }
        }
        (components::modal(&dish_modal))
        div.toast-container id=(TOAST_CONTAINER) aria-live="polite" {}
        div id=(OVERLAY_ROOT) {}
    };
    base_document(&config.site.name, None, content)
}

/// Standalone detail page for one dish.
pub fn render_dish_page(config: &SiteConfig, catalog: &Catalog, id: &str) -> Markup {
    let title = match catalog.get(id) {
        Ok(dish) => format!("{} - {}", dish.name, config.site.name),
        Err(_) => config.site.name.clone(),
    };
    let content = html! {
        (render_nav(config, "menu", &format!("{DISH_PAGE_ROOT}index.html")))
        main.dish-page {
            (detail::render_detail(catalog, id, DISH_PAGE_ROOT))
        }
    };
    base_document(&title, Some("dish-page-body"), content)
}

// ============================================================================
// Tests
// ============================================================================
