//! # Ivory Site
//!
//! The single-page site of The Ivory Restaurant: four page sections (home,
//! menu, about, contact) in one document, a searchable dish menu, a dish
//! detail modal, toasts, and a favorites list kept in local storage.
//!
//! # Architecture
//!
//! The crate splits into a pure core and a thin shell around it:
//!
//! ```text
//! catalog ──► components ──► detail
//!    │            │             │
//!    └────────────┴──► navigation / overlay ──► shell (App) ──► Host
//! ```
//!
//! Everything below [`shell`] is either pure data-to-markup or a small state
//! machine. The [`shell::App`] routes [`shell::HostEvent`]s to those
//! controllers and writes the resulting markup and visibility flags through
//! the [`host::Host`] traits. [`host::HeadlessHost`] implements them in
//! memory with a virtual clock, which is what the tests drive.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Dish records, lookup, category filter, search, recommendations |
//! | [`components`] | Stateless markup builders: buttons, inputs, cards, toasts, modals, spinners |
//! | [`detail`] | The full dish detail fragment shown in the modal and on dish pages |
//! | [`navigation`] | Active page, mobile menu and navbar scroll state |
//! | [`overlay`] | Modal state and the toast queue with its dismissal timers |
//! | [`favorites`] | Favorite dish ids persisted under one storage key |
//! | [`actions`] | Add to order, share, favorite and image upload actions with their confirmations |
//! | [`shell`] | Event routing: subscriptions table, menu filter, the `App` |
//! | [`host`] | Environment traits (surface, timers, storage, share) and their implementations |
//! | [`config`] | `config.toml` loading, stock defaults, merging, validation |
//! | [`generate`] | Writes `index.html` and one page per dish |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! Markup is built with [Maud](https://maud.lambda.xyz/). Interpolation is
//! escaped by default, so dish text and widget titles never need manual
//! escaping. The few places that accept raw HTML take a [`components::Content`]
//! and say so in the type.
//!
//! ## Timers Are Data
//!
//! Toast dismissal is scheduled as a [`host::TimerTask`] carrying a ticket
//! with a serial number. A timer whose toast was already dismissed, or whose
//! id was reused by a newer toast, is recognized as stale and ignored. This
//! keeps the overlay logic testable without a real clock.
//!
//! ## Best-Effort Platform Services
//!
//! Storage and sharing can fail in a browser (private mode, no clipboard).
//! Neither failure is fatal: favorites fall back to an empty set and a
//! failed share shows the link in a warning toast.

pub mod actions;
pub mod catalog;
pub mod components;
pub mod config;
pub mod detail;
pub mod favorites;
pub mod generate;
pub mod host;
pub mod navigation;
pub mod output;
pub mod overlay;
pub mod shell;

#[cfg(test)]
pub(crate) mod test_helpers;
