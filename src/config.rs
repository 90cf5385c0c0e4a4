//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged over them key by
//! key, so a config file only needs the values it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "The Ivory Restaurant"
//! tagline = "Caribbean coastal cuisine, elevated"
//! origin = "https://theivory.example"   # Base URL used in share links
//!
//! [navigation]
//! pages = ["home", "menu", "about", "contact"]
//! default_page = "home"
//!
//! [toasts]
//! duration_ms = 5000        # Auto-dismiss delay; per-toast override allowed
//! exit_ms = 300             # Exit animation before the element is removed
//!
//! [favorites]
//! storage_key = "ivory-favorites"
//!
//! [[features]]              # Home page feature cards
//! title = "Fresh Ingredients"
//! description = "..."
//! icon = "star"             # Optional, see components::Icon
//!
//! [[contacts]]              # Contact page cards
//! [[stats]]                 # About page figures
//! ```
//!
//! Declaring any `[[features]]`, `[[contacts]]` or `[[stats]]` entry replaces
//! the whole stock list for that section.
//!
//! Unknown keys are rejected to catch typos early.

use crate::components::{ContactSpec, FeatureSpec, Icon, StatSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub navigation: NavigationConfig,
    pub toasts: ToastConfig,
    pub favorites: FavoritesConfig,
    pub features: Vec<FeatureSpec>,
    pub contacts: Vec<ContactSpec>,
    pub stats: Vec<StatSpec>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteInfo::default(),
            navigation: NavigationConfig::default(),
            toasts: ToastConfig::default(),
            favorites: FavoritesConfig::default(),
            features: default_features(),
            contacts: default_contacts(),
            stats: default_stats(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation("site.name must not be empty".into()));
        }
        if self.site.origin.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.origin must not end with '/'".into(),
            ));
        }
        let pages = &self.navigation.pages;
        if pages.is_empty() {
            return Err(ConfigError::Validation(
                "navigation.pages must not be empty".into(),
            ));
        }
        for (i, page) in pages.iter().enumerate() {
            if page.is_empty() || !page.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(ConfigError::Validation(format!(
                    "navigation.pages: '{page}' must be non-empty and use only letters, digits and '-'"
                )));
            }
            if pages[..i].contains(page) {
                return Err(ConfigError::Validation(format!(
                    "navigation.pages: '{page}' is listed twice"
                )));
            }
        }
        if !pages.contains(&self.navigation.default_page) {
            return Err(ConfigError::Validation(format!(
                "navigation.default_page '{}' is not one of navigation.pages",
                self.navigation.default_page
            )));
        }
        if self.toasts.duration_ms == 0 {
            return Err(ConfigError::Validation(
                "toasts.duration_ms must be greater than 0".into(),
            ));
        }
        if self.favorites.storage_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "favorites.storage_key must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Site identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Restaurant name; page title and share titles.
    pub name: String,
    /// One-line hero text on the home page.
    pub tagline: String,
    /// Base URL of the deployed site, without trailing slash.
    pub origin: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "The Ivory Restaurant".to_string(),
            tagline: "Caribbean coastal cuisine, elevated".to_string(),
            origin: "https://theivory.example".to_string(),
        }
    }
}

/// Top-level pages, in nav bar order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    pub pages: Vec<String>,
    /// Page shown on load.
    pub default_page: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            pages: ["home", "menu", "about", "contact"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            default_page: "home".to_string(),
        }
    }
}

/// Toast timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToastConfig {
    /// Auto-dismiss delay for toasts that don't set their own.
    pub duration_ms: u64,
    /// Exit animation length before the element is removed.
    pub exit_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration_ms: 5000,
            exit_ms: 300,
        }
    }
}

impl ToastConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FavoritesConfig {
    /// Key the favorites array is stored under.
    pub storage_key: String,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            storage_key: crate::favorites::DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

fn default_features() -> Vec<FeatureSpec> {
    vec![
        FeatureSpec {
            title: "Fresh From the Coast".to_string(),
            description: "Daily catches from Barranquilla's waters, prepared the same day."
                .to_string(),
            icon: None,
        },
        FeatureSpec {
            title: "Heritage Recipes".to_string(),
            description: "Afro-Caribbean and Colombian traditions, refined for today's table."
                .to_string(),
            icon: Some(Icon::Plate),
        },
        FeatureSpec {
            title: "Curated Pairings".to_string(),
            description: "Every dish comes with wine and cocktail suggestions from our team."
                .to_string(),
            icon: Some(Icon::Heart),
        },
    ]
}

fn default_contacts() -> Vec<ContactSpec> {
    vec![
        ContactSpec {
            title: "Location".to_string(),
            content: "Carrera 52 #76-120, Barranquilla, Colombia".to_string(),
            icon: None,
        },
        ContactSpec {
            title: "Reservations".to_string(),
            content: "+57 605 000 0000".to_string(),
            icon: Some(Icon::Phone),
        },
        ContactSpec {
            title: "Email".to_string(),
            content: "hello@theivory.example".to_string(),
            icon: Some(Icon::Mail),
        },
        ContactSpec {
            title: "Hours".to_string(),
            content: "Tuesday to Sunday, 12:00 to 23:00".to_string(),
            icon: Some(Icon::Clock),
        },
    ]
}

fn default_stats() -> Vec<StatSpec> {
    [("15+", "Years of Tradition"), ("6", "Signature Dishes"), ("50+", "Wine Selections")]
        .iter()
        .map(|(number, label)| StatSpec {
            number: number.to_string(),
            label: label.to_string(),
        })
        .collect()
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values
///   entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Ivory Site Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Restaurant name, used for the page title and share titles.
name = "The Ivory Restaurant"

# Hero line on the home page.
tagline = "Caribbean coastal cuisine, elevated"

# Base URL of the deployed site, without trailing slash.
# Share links point at {origin}/?dish={id}.
origin = "https://theivory.example"

# ---------------------------------------------------------------------------
# Navigation
# ---------------------------------------------------------------------------
[navigation]
# Top-level pages in nav bar order. Each gets a <section id="{page}-page">.
pages = ["home", "menu", "about", "contact"]

# Page shown on load. Must be one of `pages`.
default_page = "home"

# ---------------------------------------------------------------------------
# Toast notifications
# ---------------------------------------------------------------------------
[toasts]
# Auto-dismiss delay in milliseconds for toasts that don't set their own.
duration_ms = 5000

# Exit animation length before the toast element is removed.
exit_ms = 300

# ---------------------------------------------------------------------------
# Favorites
# ---------------------------------------------------------------------------
[favorites]
# Storage key holding the JSON array of favorite dish ids.
storage_key = "ivory-favorites"

# ---------------------------------------------------------------------------
# Home page features. Declaring any entry replaces the whole list.
# icon is optional: plate, star, pin, phone, mail, clock, people, heart, ...
# ---------------------------------------------------------------------------
[[features]]
title = "Fresh From the Coast"
description = "Daily catches from Barranquilla's waters, prepared the same day."

[[features]]
title = "Heritage Recipes"
description = "Afro-Caribbean and Colombian traditions, refined for today's table."
icon = "plate"

[[features]]
title = "Curated Pairings"
description = "Every dish comes with wine and cocktail suggestions from our team."
icon = "heart"

# ---------------------------------------------------------------------------
# Contact page cards. Declaring any entry replaces the whole list.
# ---------------------------------------------------------------------------
[[contacts]]
title = "Location"
content = "Carrera 52 #76-120, Barranquilla, Colombia"

[[contacts]]
title = "Reservations"
content = "+57 605 000 0000"
icon = "phone"

[[contacts]]
title = "Email"
content = "hello@theivory.example"
icon = "mail"

[[contacts]]
title = "Hours"
content = "Tuesday to Sunday, 12:00 to 23:00"
icon = "clock"

# ---------------------------------------------------------------------------
# About page figures. Declaring any entry replaces the whole list.
# ---------------------------------------------------------------------------
[[stats]]
number = "15+"
label = "Years of Tradition"

[[stats]]
number = "6"
label = "Signature Dishes"

[[stats]]
number = "50+"
label = "Wine Selections"
"##
}
