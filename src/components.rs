//! Reusable UI components.
//!
//! Every builder here is a pure function from a widget spec to a maud
//! [`Markup`] fragment. Nothing reads or mutates state outside its arguments.
//!
//! ## Escaping
//!
//! All text is interpolated through maud, which escapes it. Icons come from
//! the closed [`Icon`] set, so callers never hand raw markup to a builder;
//! the only pre-escaped input accepted is [`Content::Markup`], which callers
//! obtain from another builder. Image sources additionally go through
//! [`safe_src`], which drops script URLs.
//!
//! ## Activation hooks
//!
//! Builders never emit inline JavaScript. Interactive elements carry a
//! `data-action` attribute (and a `data-target` for the dish/page/toast id),
//! which the App Shell's subscription table maps to a controller method. See
//! [`crate::shell::Subscriptions`].
//!
//! ## Defaults
//!
//! | Widget | Field | Default |
//! |--------|-------|---------|
//! | Button | `variant` | `primary` (also for unknown values) |
//! | Button | `size` | `md` (also for unknown values) |
//! | Button | `disabled` | `false` |
//! | Input | `input_type` | `text` |
//! | Input | `name` | the input `id` |
//! | Toast | `kind` | `info` (also for unknown values) |
//! | Toast | `id` | freshly generated, see [`fresh_toast_id`] |
//! | Feature card | `icon` | [`Icon::Star`] |
//! | Contact card | `icon` | [`Icon::Pin`] |

use crate::catalog::DishRecord;
use crate::host::LOADING_OVERLAY;
use maud::{Markup, PreEscaped, Render, html};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("Invalid {kind} spec: {source}")]
    InvalidSpec {
        kind: WidgetKind,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// Icons
// ============================================================================

/// Bundled SVG icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Plate,
    Star,
    Pin,
    Phone,
    Mail,
    Clock,
    People,
    Chili,
    ChevronRight,
    Close,
    Success,
    Error,
    Warning,
    Info,
    Share,
    Heart,
}

impl Icon {
    fn svg(self) -> &'static str {
        match self {
            Icon::Plate => {
                r#"<svg width="60" height="60" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M12 2C6.48 2 2 6.48 2 12s4.48 10 10 10 10-4.48 10-10S17.52 2 12 2z" fill="currentColor"/></svg>"#
            }
            Icon::Star => {
                r#"<svg width="40" height="40" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M12 2l3.09 6.26L22 9.27l-5 4.87 1.18 6.88L12 17.77l-6.18 3.25L7 14.14 2 9.27l6.91-1.01L12 2z" fill="currentColor"/></svg>"#
            }
            Icon::Pin => {
                r#"<svg width="30" height="30" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M12 2C8.13 2 5 5.13 5 9c0 5.25 7 13 7 13s7-7.75 7-13c0-3.87-3.13-7-7-7z" fill="currentColor"/></svg>"#
            }
            Icon::Phone => {
                r#"<svg width="30" height="30" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M6.6 10.8a15.1 15.1 0 006.6 6.6l2.2-2.2a1 1 0 011-.25 11.4 11.4 0 003.6.57 1 1 0 011 1V20a1 1 0 01-1 1A17 17 0 013 4a1 1 0 011-1h3.5a1 1 0 011 1c0 1.25.2 2.45.57 3.57a1 1 0 01-.25 1z" fill="currentColor"/></svg>"#
            }
            Icon::Mail => {
                r#"<svg width="30" height="30" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M4 4h16a2 2 0 012 2v12a2 2 0 01-2 2H4a2 2 0 01-2-2V6a2 2 0 012-2zm0 2v.5l8 5 8-5V6H4z" fill="currentColor"/></svg>"#
            }
            Icon::Clock => {
                r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M12 6v6l4 2m6-2a10 10 0 11-20 0 10 10 0 0120 0z" stroke="currentColor" stroke-width="2"/></svg>"#
            }
            Icon::People => {
                r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M17 20h5v-2a3 3 0 00-5.36-1.86M17 20H7m10 0v-2c0-.66-.13-1.28-.36-1.86M7 20H2v-2a3 3 0 015.36-1.86M7 20v-2c0-.66.13-1.28.36-1.86m0 0a5 5 0 019.28 0M15 7a3 3 0 11-6 0 3 3 0 016 0z" stroke="currentColor" stroke-width="2"/></svg>"#
            }
            Icon::Chili => {
                r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M12 3c0 2 1 3 3 3M8 8c4-2 9 0 9 5 0 5-6 8-12 8 4-3 3-11 3-13z" stroke="currentColor" stroke-width="2"/></svg>"#
            }
            Icon::ChevronRight => {
                r#"<svg width="20" height="20" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M9 18l6-6-6-6" stroke="currentColor" stroke-width="2"/></svg>"#
            }
            Icon::Close => {
                r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M6 6l12 12M6 18L18 6" stroke="currentColor" stroke-width="2"/></svg>"#
            }
            Icon::Success => {
                r#"<svg width="20" height="20" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M9 12l2 2 4-4m6 2a9 9 0 11-18 0 9 9 0 0118 0z" stroke="currentColor" stroke-width="2"/></svg>"#
            }
            Icon::Error => {
                r#"<svg width="20" height="20" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M10 14l2-2m0 0l2-2m-2 2l-2-2m2 2l2 2m7-2a9 9 0 11-18 0 9 9 0 0118 0z" stroke="currentColor" stroke-width="2"/></svg>"#
            }
            Icon::Warning => {
                r#"<svg width="20" height="20" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M12 9v2m0 4h.01m-6.938 4h13.856c1.54 0 2.502-1.667 1.732-3L13.732 4c-.77-1.333-2.694-1.333-3.464 0L3.34 16c-.77 1.333.192 3 1.732 3z" stroke="currentColor" stroke-width="2"/></svg>"#
            }
            Icon::Info => {
                r#"<svg width="20" height="20" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M13 16h-1v-4h-1m1-4h.01M21 12a9 9 0 11-18 0 9 9 0 0118 0z" stroke="currentColor" stroke-width="2"/></svg>"#
            }
            Icon::Share => {
                r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M8.7 10.7l6.6-3.4m-6.6 6 6.6 3.4M21 5a3 3 0 11-6 0 3 3 0 016 0zM9 12a3 3 0 11-6 0 3 3 0 016 0zm12 7a3 3 0 11-6 0 3 3 0 016 0z" stroke="currentColor" stroke-width="2"/></svg>"#
            }
            Icon::Heart => {
                r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" aria-hidden="true"><path d="M12 21l-1.45-1.32C5.4 15.36 2 12.28 2 8.5 2 5.42 4.42 3 7.5 3c1.74 0 3.41.81 4.5 2.09C13.09 3.81 14.76 3 16.5 3 19.58 3 22 5.42 22 8.5c0 3.78-3.4 6.86-8.55 11.54L12 21z" stroke="currentColor" stroke-width="2"/></svg>"#
            }
        }
    }
}

impl Render for Icon {
    fn render(&self) -> Markup {
        PreEscaped(self.svg().to_string())
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Body content for cards and modals.
///
/// Text deserialized from a spec is escaped and wrapped in a paragraph;
/// markup can only be supplied from Rust, typically from another builder.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "String")]
pub enum Content {
    Text(String),
    Markup(Markup),
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<Markup> for Content {
    fn from(markup: Markup) -> Self {
        Content::Markup(markup)
    }
}

impl Render for Content {
    fn render(&self) -> Markup {
        match self {
            Content::Text(text) => html! { p { (text) } },
            Content::Markup(markup) => markup.clone(),
        }
    }
}

/// Join non-empty class names with single spaces.
fn classes(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the URL if it is safe to use as an image source.
///
/// Relative paths, `http(s)` URLs and `data:image/` URIs pass; script
/// schemes and any other `data:` payloads are rejected.
pub fn safe_src(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    let scheme = lower.split_once(':').map(|(s, _)| s);
    match scheme {
        Some("http") | Some("https") => Some(trimmed),
        Some("data") if lower.starts_with("data:image/") => Some(trimmed),
        // A colon after the first slash belongs to the path, not a scheme.
        Some(s) if s.contains('/') => Some(trimmed),
        Some(_) => None,
        None => Some(trimmed),
    }
}

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

/// A toast id no other generated toast in this process has used.
pub fn fresh_toast_id() -> String {
    format!("auto-{}", NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed))
}

/// DOM id of the element rendered for toast `id`.
pub fn toast_element_id(id: &str) -> String {
    format!("toast-{id}")
}

// ============================================================================
// Buttons
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Ghost,
}

impl From<String> for ButtonVariant {
    fn from(value: String) -> Self {
        match value.as_str() {
            "secondary" => ButtonVariant::Secondary,
            "outline" => ButtonVariant::Outline,
            "ghost" => ButtonVariant::Ghost,
            _ => ButtonVariant::Primary,
        }
    }
}

impl ButtonVariant {
    fn class(self) -> &'static str {
        match self {
            ButtonVariant::Primary => "btn-primary",
            ButtonVariant::Secondary => "btn-secondary",
            ButtonVariant::Outline => "btn-outline",
            ButtonVariant::Ghost => "btn-ghost",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ButtonSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl From<String> for ButtonSize {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sm" => ButtonSize::Sm,
            "lg" => ButtonSize::Lg,
            _ => ButtonSize::Md,
        }
    }
}

impl ButtonSize {
    fn class(self) -> &'static str {
        match self {
            ButtonSize::Sm => "btn-sm",
            ButtonSize::Md => "btn-md",
            ButtonSize::Lg => "btn-lg",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ButtonSpec {
    pub text: String,
    #[serde(default)]
    pub variant: ButtonVariant,
    #[serde(default)]
    pub size: ButtonSize,
    #[serde(default)]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub end_icon: Option<Icon>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub id: Option<String>,
    /// Emitted as `data-action`; the shell routes it to a handler.
    #[serde(default)]
    pub on_activate: Option<String>,
    /// Emitted as `data-target`: the dish, page or toast the action applies to.
    #[serde(default)]
    pub target: Option<String>,
    /// Extra CSS classes.
    #[serde(default)]
    pub class: Option<String>,
}

impl ButtonSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            variant: ButtonVariant::default(),
            size: ButtonSize::default(),
            icon: None,
            end_icon: None,
            disabled: false,
            id: None,
            on_activate: None,
            target: None,
            class: None,
        }
    }

    /// Attach an activation hook and its target.
    pub fn action(mut self, action: &str, target: &str) -> Self {
        self.on_activate = Some(action.to_string());
        self.target = Some(target.to_string());
        self
    }
}

pub fn button(spec: &ButtonSpec) -> Markup {
    let class = classes(&[
        "btn",
        spec.variant.class(),
        spec.size.class(),
        spec.class.as_deref().unwrap_or_default(),
    ]);
    html! {
        button type="button"
            class=(class)
            id=[spec.id.as_deref()]
            data-action=[spec.on_activate.as_deref()]
            data-target=[spec.target.as_deref()]
            disabled[spec.disabled] {
            @if let Some(icon) = spec.icon {
                span.btn-icon { (icon) }
            }
            span { (spec.text) }
            @if let Some(icon) = spec.end_icon {
                span.btn-end-icon { (icon) }
            }
        }
    }
}

// ============================================================================
// Inputs
// ============================================================================

fn default_input_type() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSpec {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_input_type", rename = "type")]
    pub input_type: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub start_icon: Option<Icon>,
    #[serde(default)]
    pub end_icon: Option<Icon>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub helper_text: Option<String>,
    #[serde(default)]
    pub error_text: Option<String>,
}

impl InputSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            name: None,
            input_type: default_input_type(),
            placeholder: String::new(),
            start_icon: None,
            end_icon: None,
            required: false,
            disabled: false,
            value: None,
            helper_text: None,
            error_text: None,
        }
    }
}

pub fn input(spec: &InputSpec) -> Markup {
    let class = classes(&[
        "input-field",
        if spec.start_icon.is_some() { "has-start-icon" } else { "" },
        if spec.end_icon.is_some() { "has-end-icon" } else { "" },
    ]);
    let name = spec.name.as_deref().unwrap_or(&spec.id);
    html! {
        div.input-group {
            @if let Some(label) = &spec.label {
                label.input-label for=(spec.id) { (label) }
            }
            div.input-wrapper {
                @if let Some(icon) = spec.start_icon {
                    span.input-start-icon { (icon) }
                }
                input type=(spec.input_type)
                    id=(spec.id)
                    name=(name)
                    placeholder=(spec.placeholder)
                    class=(class)
                    value=[spec.value.as_deref()]
                    required[spec.required]
                    disabled[spec.disabled];
                @if let Some(icon) = spec.end_icon {
                    span.input-end-icon { (icon) }
                }
            }
            @if let Some(helper) = &spec.helper_text {
                span.input-helper { (helper) }
            }
            @if let Some(error) = &spec.error_text {
                span.input-error { (error) }
            }
        }
    }
}

// ============================================================================
// Cards
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardSpec {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<Content>,
    pub image: Option<String>,
    pub image_alt: String,
    pub class: Option<String>,
    pub on_activate: Option<String>,
    pub target: Option<String>,
    pub actions: Vec<ButtonSpec>,
}

pub fn card(spec: &CardSpec) -> Markup {
    let class = classes(&["card", spec.class.as_deref().unwrap_or_default()]);
    let image = spec.image.as_deref().and_then(safe_src);
    html! {
        div class=(class)
            data-action=[spec.on_activate.as_deref()]
            data-target=[spec.target.as_deref()] {
            @if let Some(src) = image {
                div.card-image {
                    img src=(src) alt=(spec.image_alt);
                }
            }
            div.card-content {
                @if let Some(title) = &spec.title {
                    h3.card-title { (title) }
                }
                @if let Some(subtitle) = &spec.subtitle {
                    p.card-subtitle { (subtitle) }
                }
                @if let Some(content) = &spec.content {
                    div.card-body { (content) }
                }
                @if !spec.actions.is_empty() {
                    div.card-actions {
                        @for action in &spec.actions {
                            (button(action))
                        }
                    }
                }
            }
        }
    }
}

/// Catalog entry on the menu grid; activating it opens the dish modal.
pub fn dish_card(dish: &DishRecord) -> Markup {
    let image = dish.image.as_deref().and_then(safe_src);
    html! {
        article.dish-card
            data-reveal
            data-action="open-dish"
            data-target=(dish.id)
            data-category=(dish.category)
            tabindex="0" {
            div.dish-image {
                @if let Some(src) = image {
                    img src=(src) alt=(dish.name) loading="lazy";
                } @else {
                    div.image-placeholder { (Icon::Plate) }
                }
            }
            div.dish-info {
                h3.dish-name { (dish.name) }
                p.dish-description { (dish.short_description) }
                span.dish-price { (dish.price_label()) }
            }
            div.dish-arrow { (Icon::ChevronRight) }
        }
    }
}

/// Menu grid contents: one card per dish, or an empty-state note.
pub fn dish_grid<'a>(dishes: impl IntoIterator<Item = &'a DishRecord>) -> Markup {
    let mut dishes = dishes.into_iter().peekable();
    if dishes.peek().is_none() {
        return html! {
            div.menu-empty {
                (Icon::Plate)
                p { "No dishes match your search." }
            }
        };
    }
    html! {
        @for dish in dishes {
            (dish_card(dish))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureSpec {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

pub fn feature_card(spec: &FeatureSpec) -> Markup {
    html! {
        div.feature-card data-reveal {
            div.feature-icon { (spec.icon.unwrap_or(Icon::Star)) }
            h3 { (spec.title) }
            p { (spec.description) }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactSpec {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

pub fn contact_card(spec: &ContactSpec) -> Markup {
    html! {
        div.contact-item data-reveal {
            div.contact-icon { (spec.icon.unwrap_or(Icon::Pin)) }
            h3 { (spec.title) }
            p { (spec.content) }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatSpec {
    pub number: String,
    pub label: String,
}

pub fn stat_item(spec: &StatSpec) -> Markup {
    html! {
        div.stat-item data-reveal {
            h3 { (spec.number) }
            p { (spec.label) }
        }
    }
}

// ============================================================================
// Toasts
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl From<String> for ToastKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => ToastKind::Success,
            "error" => ToastKind::Error,
            "warning" => ToastKind::Warning,
            _ => ToastKind::Info,
        }
    }
}

impl ToastKind {
    pub fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast-success",
            ToastKind::Error => "toast-error",
            ToastKind::Warning => "toast-warning",
            ToastKind::Info => "toast-info",
        }
    }

    pub fn icon(self) -> Icon {
        match self {
            ToastKind::Success => Icon::Success,
            ToastKind::Error => Icon::Error,
            ToastKind::Warning => Icon::Warning,
            ToastKind::Info => Icon::Info,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToastSpec {
    pub title: String,
    #[serde(default)]
    pub kind: ToastKind,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    /// Auto-dismiss delay in milliseconds. `Some(0)` makes the toast sticky;
    /// `None` uses the controller's default.
    #[serde(default, rename = "duration")]
    pub duration_ms: Option<u64>,
}

impl ToastSpec {
    pub fn new(kind: ToastKind, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            message: None,
            id: None,
            duration_ms: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Render a toast with an explicit id (the controller assigns one before
/// rendering; see [`Widget::render`] for the generated-id path).
pub fn toast(spec: &ToastSpec, id: &str) -> Markup {
    let class = classes(&["toast", spec.kind.class()]);
    html! {
        div class=(class) id=(toast_element_id(id)) data-toast-id=(id) role="status" {
            div.toast-icon { (spec.kind.icon()) }
            div.toast-content {
                div.toast-title { (spec.title) }
                @if let Some(message) = &spec.message {
                    div.toast-message { (message) }
                }
            }
            button.toast-close type="button" data-action="dismiss-toast" data-target=(id) aria-label="Dismiss" {
                (Icon::Close)
            }
        }
    }
}

// ============================================================================
// Modals and loading states
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalSize {
    Sm,
    Md,
    Lg,
    Wide,
}

impl ModalSize {
    fn class(self) -> &'static str {
        match self {
            ModalSize::Sm => "modal-sm",
            ModalSize::Md => "modal-md",
            ModalSize::Lg => "modal-lg",
            ModalSize::Wide => "modal-wide",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModalSpec {
    pub id: String,
    pub title: String,
    pub content: Content,
    #[serde(default)]
    pub size: Option<ModalSize>,
    #[serde(default)]
    pub actions: Vec<ButtonSpec>,
}

/// DOM id of the body container inside modal `id`.
pub fn modal_body_id(id: &str) -> String {
    format!("{id}-body")
}

pub fn modal(spec: &ModalSpec) -> Markup {
    let class = classes(&["modal", spec.size.map(ModalSize::class).unwrap_or_default()]);
    let title_id = format!("{}-title", spec.id);
    html! {
        div class=(class) id=(spec.id) role="dialog" aria-modal="true" aria-labelledby=(title_id) {
            div.modal-backdrop data-action="close-modal" data-target=(spec.id) {}
            div.modal-dialog {
                div.modal-content {
                    div.modal-header {
                        h2.modal-title id=(title_id) { (spec.title) }
                        button.modal-close type="button" data-action="close-modal" data-target=(spec.id) aria-label="Close" {
                            (Icon::Close)
                        }
                    }
                    div.modal-body id=(modal_body_id(&spec.id)) {
                        (spec.content)
                    }
                    @if !spec.actions.is_empty() {
                        div.modal-footer {
                            @for action in &spec.actions {
                                (button(action))
                            }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpinnerSize {
    Sm,
    #[default]
    Md,
    Lg,
}

pub fn loading_spinner(size: SpinnerSize) -> Markup {
    let size_class = match size {
        SpinnerSize::Sm => "spinner-sm",
        SpinnerSize::Md => "spinner-md",
        SpinnerSize::Lg => "spinner-lg",
    };
    html! {
        div class=(classes(&["loading-spinner", size_class])) role="progressbar" {
            svg.spin viewBox="0 0 24 24" fill="none" aria-hidden="true" {
                circle cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4" opacity="0.25" {}
                path d="M4 12a8 8 0 018-8V2.5" stroke="currentColor" stroke-width="4" {}
            }
        }
    }
}

pub fn loading_overlay(message: &str) -> Markup {
    html! {
        div.loading-overlay id=(LOADING_OVERLAY) {
            div.loading-content {
                (loading_spinner(SpinnerSize::Lg))
                p.loading-text { (message) }
            }
        }
    }
}

// ============================================================================
// Generic factory
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Button,
    Input,
    Card,
    Toast,
    Modal,
    FeatureCard,
    ContactCard,
    StatItem,
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WidgetKind::Button => "button",
            WidgetKind::Input => "input",
            WidgetKind::Card => "card",
            WidgetKind::Toast => "toast",
            WidgetKind::Modal => "modal",
            WidgetKind::FeatureCard => "feature card",
            WidgetKind::ContactCard => "contact card",
            WidgetKind::StatItem => "stat item",
        };
        f.write_str(name)
    }
}

/// A widget spec of any kind, ready to render.
#[derive(Debug, Clone)]
pub enum Widget {
    Button(ButtonSpec),
    Input(InputSpec),
    Card(CardSpec),
    Toast(ToastSpec),
    Modal(ModalSpec),
    FeatureCard(FeatureSpec),
    ContactCard(ContactSpec),
    StatItem(StatSpec),
}

fn parse<T: DeserializeOwned>(kind: WidgetKind, spec: serde_json::Value) -> Result<T, ComponentError> {
    serde_json::from_value(spec).map_err(|source| ComponentError::InvalidSpec { kind, source })
}

impl Widget {
    /// Decode a loosely-typed spec object into a widget of `kind`.
    pub fn from_json(kind: WidgetKind, spec: serde_json::Value) -> Result<Self, ComponentError> {
        Ok(match kind {
            WidgetKind::Button => Widget::Button(parse(kind, spec)?),
            WidgetKind::Input => Widget::Input(parse(kind, spec)?),
            WidgetKind::Card => Widget::Card(parse(kind, spec)?),
            WidgetKind::Toast => Widget::Toast(parse(kind, spec)?),
            WidgetKind::Modal => Widget::Modal(parse(kind, spec)?),
            WidgetKind::FeatureCard => Widget::FeatureCard(parse(kind, spec)?),
            WidgetKind::ContactCard => Widget::ContactCard(parse(kind, spec)?),
            WidgetKind::StatItem => Widget::StatItem(parse(kind, spec)?),
        })
    }

    pub fn render(&self) -> Markup {
        match self {
            Widget::Button(spec) => button(spec),
            Widget::Input(spec) => input(spec),
            Widget::Card(spec) => card(spec),
            Widget::Toast(spec) => match &spec.id {
                Some(id) => toast(spec, id),
                None => toast(spec, &fresh_toast_id()),
            },
            Widget::Modal(spec) => modal(spec),
            Widget::FeatureCard(spec) => feature_card(spec),
            Widget::ContactCard(spec) => contact_card(spec),
            Widget::StatItem(spec) => stat_item(spec),
        }
    }
}

/// Build a fragment from a widget kind and its spec object.
pub fn build(kind: WidgetKind, spec: serde_json::Value) -> Result<Markup, ComponentError> {
    Ok(Widget::from_json(kind, spec)?.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::dish;
    use serde_json::json;

    #[test]
    fn button_defaults_to_primary_md_enabled() {
        let html = build(WidgetKind::Button, json!({"text": "Add to Order"}))
            .unwrap()
            .into_string();
        assert!(html.contains(r#"class="btn btn-primary btn-md""#));
        assert!(!html.contains("disabled"));
        assert!(html.contains("<span>Add to Order</span>"));
    }

    #[test]
    fn button_unknown_variant_falls_back_to_primary() {
        let html = build(
            WidgetKind::Button,
            json!({"text": "Go", "variant": "neon", "size": "xxl"}),
        )
        .unwrap()
        .into_string();
        assert!(html.contains("btn-primary"));
        assert!(html.contains("btn-md"));
    }

    #[test]
    fn button_renders_options() {
        let spec = ButtonSpec {
            variant: ButtonVariant::Outline,
            size: ButtonSize::Lg,
            icon: Some(Icon::Share),
            disabled: true,
            id: Some("share-btn".to_string()),
            ..ButtonSpec::new("Share")
        }
        .action("share", "ceviche-tropical");
        let html = button(&spec).into_string();
        assert!(html.contains("btn-outline"));
        assert!(html.contains("btn-lg"));
        assert!(html.contains(r#"id="share-btn""#));
        assert!(html.contains(r#"data-action="share""#));
        assert!(html.contains(r#"data-target="ceviche-tropical""#));
        assert!(html.contains("disabled"));
        assert!(html.contains("btn-icon"));
        assert!(!html.contains("btn-end-icon"));
    }

    #[test]
    fn button_without_text_is_invalid() {
        let err = build(WidgetKind::Button, json!({"variant": "ghost"})).unwrap_err();
        assert!(err.to_string().contains("button"));
    }

    #[test]
    fn button_never_emits_inline_handlers() {
        let spec = ButtonSpec::new("x").action("alert(1)\" onclick=\"boom", "t");
        let html = button(&spec).into_string();
        assert!(!html.contains("onclick=\""));
        assert!(html.contains("&quot;"));
    }

    #[test]
    fn input_defaults_name_and_type() {
        let html = input(&InputSpec::new("email")).into_string();
        assert!(html.contains(r#"type="text""#));
        assert!(html.contains(r#"name="email""#));
        assert!(!html.contains("input-label"));
        assert!(!html.contains("required"));
    }

    #[test]
    fn input_from_json_with_label_and_errors() {
        let html = build(
            WidgetKind::Input,
            json!({
                "id": "search",
                "type": "search",
                "label": "Search dishes",
                "start_icon": "star",
                "required": true,
                "error_text": "Too short"
            }),
        )
        .unwrap()
        .into_string();
        assert!(html.contains(r#"for="search""#));
        assert!(html.contains(r#"type="search""#));
        assert!(html.contains("has-start-icon"));
        assert!(html.contains("required"));
        assert!(html.contains("Too short"));
    }

    #[test]
    fn card_escapes_text_content() {
        let html = build(
            WidgetKind::Card,
            json!({"title": "<b>Hi</b>", "content": "<script>x()</script>"}),
        )
        .unwrap()
        .into_string();
        assert!(html.contains("&lt;b&gt;Hi&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn card_drops_script_image_urls() {
        let spec = CardSpec {
            image: Some("javascript:alert(1)".to_string()),
            ..CardSpec::default()
        };
        assert!(!card(&spec).into_string().contains("card-image"));
    }

    #[test]
    fn card_renders_actions() {
        let spec = CardSpec {
            title: Some("Tasting menu".to_string()),
            actions: vec![ButtonSpec::new("Book"), ButtonSpec::new("Details")],
            ..CardSpec::default()
        };
        let html = card(&spec).into_string();
        assert!(html.contains("card-actions"));
        assert_eq!(html.matches("<button").count(), 2);
    }

    #[test]
    fn safe_src_rules() {
        assert_eq!(safe_src("images/a.jpg"), Some("images/a.jpg"));
        assert_eq!(safe_src("https://x.test/a.jpg"), Some("https://x.test/a.jpg"));
        assert!(safe_src("data:image/png;base64,AAAA").is_some());
        assert!(safe_src("/images/a:b.jpg").is_some());
        assert!(safe_src("JavaScript:alert(1)").is_none());
        assert!(safe_src("data:text/html,<b>").is_none());
        assert!(safe_src("  ").is_none());
    }

    #[test]
    fn toast_kind_maps_class_and_defaults_to_info() {
        let html = build(
            WidgetKind::Toast,
            json!({"title": "Saved", "kind": "success", "id": "t1"}),
        )
        .unwrap()
        .into_string();
        assert!(html.contains("toast-success"));
        assert!(html.contains(r#"data-toast-id="t1""#));
        assert!(html.contains(r#"id="toast-t1""#));
        assert!(!html.contains("toast-message"));

        let html = build(WidgetKind::Toast, json!({"title": "?", "kind": "party"}))
            .unwrap()
            .into_string();
        assert!(html.contains("toast-info"));
    }

    #[test]
    fn toast_without_id_gets_unique_ids() {
        let a = build(WidgetKind::Toast, json!({"title": "a"})).unwrap().into_string();
        let b = build(WidgetKind::Toast, json!({"title": "b"})).unwrap().into_string();
        let id_of = |html: &str| {
            let start = html.find("data-toast-id=\"").unwrap() + "data-toast-id=\"".len();
            html[start..].split('"').next().unwrap().to_string()
        };
        assert_ne!(id_of(&a), id_of(&b));
    }

    #[test]
    fn toast_spec_duration_field() {
        let spec: ToastSpec = serde_json::from_value(json!({"title": "x", "duration": 0})).unwrap();
        assert_eq!(spec.duration_ms, Some(0));
        let spec: ToastSpec = serde_json::from_value(json!({"title": "x"})).unwrap();
        assert_eq!(spec.duration_ms, None);
    }

    #[test]
    fn modal_structure() {
        let spec = ModalSpec {
            id: "confirm".to_string(),
            title: "Confirm".to_string(),
            content: Content::from("Are you sure?"),
            size: Some(ModalSize::Sm),
            actions: vec![ButtonSpec::new("Yes")],
        };
        let html = modal(&spec).into_string();
        assert!(html.contains(r#"class="modal modal-sm""#));
        assert!(html.contains(r#"id="confirm-body""#));
        assert!(html.contains(r#"data-action="close-modal""#));
        assert!(html.contains("<p>Are you sure?</p>"));
        assert!(html.contains("modal-footer"));
    }

    #[test]
    fn modal_requires_content() {
        let result = build(WidgetKind::Modal, json!({"id": "m", "title": "t"}));
        assert!(matches!(result, Err(ComponentError::InvalidSpec { kind: WidgetKind::Modal, .. })));
    }

    #[test]
    fn modal_accepts_prebuilt_markup() {
        let spec = ModalSpec {
            id: "m".to_string(),
            title: "t".to_string(),
            content: Content::from(stat_item(&StatSpec {
                number: "15+".to_string(),
                label: "Years".to_string(),
            })),
            size: None,
            actions: vec![],
        };
        let html = modal(&spec).into_string();
        assert!(html.contains(r#"<div class="stat-item" data-reveal>"#));
        assert!(!html.contains("modal-footer"));
        assert!(html.contains(r#"class="modal""#));
    }

    #[test]
    fn scroll_revealed_cards_are_marked() {
        let feature = FeatureSpec {
            icon: None,
            title: "Fresh".to_string(),
            description: "Daily catch".to_string(),
        };
        let stat = StatSpec {
            number: "15+".to_string(),
            label: "Years".to_string(),
        };
        for html in [
            feature_card(&feature).into_string(),
            stat_item(&stat).into_string(),
            dish_card(&dish("a", "Sides", 5.0)).into_string(),
        ] {
            assert!(html.contains("data-reveal"), "{html}");
        }
        assert!(!loading_overlay("Loading...").into_string().contains("data-reveal"));
    }

    #[test]
    fn feature_and_contact_cards_use_default_icons() {
        let feature = feature_card(&FeatureSpec {
            title: "Fresh".to_string(),
            description: "Daily catch".to_string(),
            icon: None,
        })
        .into_string();
        assert!(feature.contains(Icon::Star.svg()));

        let contact = contact_card(&ContactSpec {
            title: "Visit".to_string(),
            content: "Barranquilla".to_string(),
            icon: None,
        })
        .into_string();
        assert!(contact.contains(Icon::Pin.svg()));
    }

    #[test]
    fn dish_card_links_to_detail() {
        let html = dish_card(&dish("ceviche", "Fresh & Light", 32.0)).into_string();
        assert!(html.contains(r#"data-action="open-dish""#));
        assert!(html.contains(r#"data-target="ceviche""#));
        assert!(html.contains("Fresh &amp; Light"));
        assert!(html.contains("$32"));
    }

    #[test]
    fn dish_grid_renders_cards_or_empty_state() {
        let dishes = [dish("a", "Sides", 5.0), dish("b", "Sides", 6.0)];
        let html = dish_grid(&dishes).into_string();
        assert_eq!(html.matches("dish-card").count(), 2);

        let empty = dish_grid(&dishes[..0]).into_string();
        assert!(empty.contains("menu-empty"));
        assert!(!empty.contains("dish-card"));
    }

    #[test]
    fn loading_overlay_includes_large_spinner() {
        let html = loading_overlay("Uploading image...").into_string();
        assert!(html.contains("spinner-lg"));
        assert!(html.contains("Uploading image..."));
    }

    #[test]
    fn classes_skips_empty_parts() {
        assert_eq!(classes(&["a", "", " b "]), "a b");
    }
}
