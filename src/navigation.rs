//! Top-level page navigation and the mobile menu.
//!
//! The site is a single document with one `<section id="{page}-page">` per
//! top-level page; exactly one carries the `active` flag. The page set is
//! closed and fixed when the controller is built (from
//! [`NavigationConfig`](crate::config::NavigationConfig)). The mobile menu is
//! an independent open/closed flag.
//!
//! [`NavbarScroll`] follows the page scroll position: the navbar is flagged
//! `scrolled` once away from the top, and slides out of view while the user
//! scrolls down the page.

use crate::host::{
    self, ACTIVE, NAV_HAMBURGER, NAV_HIDDEN, NAV_MENU, NAVBAR, SCROLLED, ScrollLock, Surface,
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationError {
    #[error("Unknown page: {0}")]
    UnknownPage(String),
    #[error("Navigation needs at least one page")]
    NoPages,
}

/// Result of a [`NavigationController::navigate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Already on the requested page; nothing changed.
    Unchanged,
    Moved,
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    pages: Vec<String>,
    current: String,
    mobile_menu_open: bool,
}

impl NavigationController {
    /// Build a controller over `pages`, starting on `default_page` with the
    /// menu closed. The initial page's visual state is applied by
    /// [`activate_initial`](Self::activate_initial).
    pub fn new(pages: Vec<String>, default_page: &str) -> Result<Self, NavigationError> {
        if pages.is_empty() {
            return Err(NavigationError::NoPages);
        }
        if !pages.iter().any(|p| p == default_page) {
            return Err(NavigationError::UnknownPage(default_page.to_string()));
        }
        Ok(Self {
            pages,
            current: default_page.to_string(),
            mobile_menu_open: false,
        })
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn is_mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    pub fn is_known(&self, page: &str) -> bool {
        self.pages.iter().any(|p| p == page)
    }

    /// Flag the current page and its nav link active. Called once at startup.
    pub fn activate_initial(&self, surface: &mut impl Surface) {
        set_page_flags(surface, &self.current, true);
    }

    pub fn navigate(
        &mut self,
        page: &str,
        surface: &mut impl Surface,
    ) -> Result<Navigation, NavigationError> {
        if page == self.current {
            return Ok(Navigation::Unchanged);
        }
        if !self.is_known(page) {
            return Err(NavigationError::UnknownPage(page.to_string()));
        }

        set_page_flags(surface, &self.current, false);
        set_page_flags(surface, page, true);
        debug!(from = %self.current, to = %page, "navigate");
        self.current = page.to_string();

        self.close_mobile_menu(surface);
        surface.scroll_to_top();
        Ok(Navigation::Moved)
    }

    /// Flip the mobile menu. Returns the new open state.
    pub fn toggle_mobile_menu(&mut self, surface: &mut impl Surface) -> bool {
        if self.mobile_menu_open {
            self.close_mobile_menu(surface);
        } else {
            self.mobile_menu_open = true;
            set_menu_flags(surface, true);
            surface.lock_scroll(ScrollLock::MobileMenu);
        }
        self.mobile_menu_open
    }

    /// Close the mobile menu. Safe to call when it is already closed.
    pub fn close_mobile_menu(&mut self, surface: &mut impl Surface) {
        self.mobile_menu_open = false;
        set_menu_flags(surface, false);
        surface.release_scroll(ScrollLock::MobileMenu);
    }
}

/// Scroll offset (px) past which the navbar counts as scrolled.
pub const SCROLLED_AFTER: u32 = 50;
/// Scroll offset (px) past which scrolling down hides the navbar.
pub const HIDE_AFTER: u32 = 100;

/// Navbar state derived from successive scroll positions.
#[derive(Debug, Clone, Default)]
pub struct NavbarScroll {
    last_y: u32,
    hidden: bool,
}

impl NavbarScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Apply a new scroll offset. The navbar hides only while moving down
    /// past [`HIDE_AFTER`]; any upward move brings it back.
    pub fn on_scroll(&mut self, y: u32, surface: &mut impl Surface) {
        let hidden = y > self.last_y && y > HIDE_AFTER;
        surface.set_flag(NAVBAR, SCROLLED, y > SCROLLED_AFTER);
        surface.set_flag(NAVBAR, NAV_HIDDEN, hidden);
        if hidden != self.hidden {
            debug!(y, hidden, "navbar visibility");
        }
        self.hidden = hidden;
        self.last_y = y;
    }
}

fn set_page_flags(surface: &mut impl Surface, page: &str, on: bool) {
    surface.set_flag(&host::page_section_id(page), ACTIVE, on);
    surface.set_flag(&host::nav_link_id(page), ACTIVE, on);
}

fn set_menu_flags(surface: &mut impl Surface, open: bool) {
    surface.set_flag(NAV_HAMBURGER, ACTIVE, open);
    surface.set_flag(NAV_MENU, ACTIVE, open);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;

    fn controller() -> (NavigationController, HeadlessHost) {
        let pages = ["home", "menu", "about", "contact"]
            .iter()
            .map(|p| p.to_string())
            .collect();
        let nav = NavigationController::new(pages, "home").unwrap();
        let mut host = HeadlessHost::new();
        nav.activate_initial(&mut host);
        (nav, host)
    }

    #[test]
    fn starts_on_default_page_with_menu_closed() {
        let (nav, host) = controller();
        assert_eq!(nav.current(), "home");
        assert!(!nav.is_mobile_menu_open());
        assert_eq!(host.flagged(ACTIVE), vec!["home-page", "nav-link-home"]);
    }

    #[test]
    fn navigate_moves_active_flags_and_scrolls() {
        let (mut nav, mut host) = controller();
        assert_eq!(nav.navigate("menu", &mut host), Ok(Navigation::Moved));
        assert_eq!(nav.current(), "menu");
        assert_eq!(host.flagged(ACTIVE), vec!["menu-page", "nav-link-menu"]);
        assert_eq!(host.scroll_to_top_count(), 1);
    }

    #[test]
    fn navigate_to_current_page_is_a_no_op() {
        let (mut nav, mut host) = controller();
        nav.toggle_mobile_menu(&mut host);
        let flags_before = host.flagged(ACTIVE).len();

        assert_eq!(nav.navigate("home", &mut host), Ok(Navigation::Unchanged));
        assert_eq!(nav.current(), "home");
        assert!(nav.is_mobile_menu_open());
        assert!(host.scroll_locked());
        assert_eq!(host.flagged(ACTIVE).len(), flags_before);
        assert_eq!(host.scroll_to_top_count(), 0);
    }

    #[test]
    fn navigate_to_unknown_page_fails_without_side_effects() {
        let (mut nav, mut host) = controller();
        let result = nav.navigate("reservations", &mut host);
        assert_eq!(
            result,
            Err(NavigationError::UnknownPage("reservations".to_string()))
        );
        assert_eq!(nav.current(), "home");
        assert_eq!(host.flagged(ACTIVE), vec!["home-page", "nav-link-home"]);
        assert_eq!(host.scroll_to_top_count(), 0);
    }

    #[test]
    fn navigate_closes_open_menu() {
        let (mut nav, mut host) = controller();
        nav.toggle_mobile_menu(&mut host);
        nav.navigate("contact", &mut host).unwrap();
        assert!(!nav.is_mobile_menu_open());
        assert!(!host.scroll_locked());
        assert!(!host.has_flag(NAV_MENU, ACTIVE));
    }

    #[test]
    fn toggle_menu_locks_and_releases_scroll() {
        let (mut nav, mut host) = controller();
        assert!(nav.toggle_mobile_menu(&mut host));
        assert!(host.scroll_locked());
        assert!(host.has_flag(NAV_HAMBURGER, ACTIVE));
        assert!(host.has_flag(NAV_MENU, ACTIVE));

        assert!(!nav.toggle_mobile_menu(&mut host));
        assert!(!host.scroll_locked());
        assert!(!host.has_flag(NAV_HAMBURGER, ACTIVE));
    }

    #[test]
    fn close_menu_is_idempotent() {
        let (mut nav, mut host) = controller();
        nav.close_mobile_menu(&mut host);
        assert!(!nav.is_mobile_menu_open());
        nav.toggle_mobile_menu(&mut host);
        nav.close_mobile_menu(&mut host);
        nav.close_mobile_menu(&mut host);
        assert!(!nav.is_mobile_menu_open());
        assert!(!host.scroll_locked());
    }

    #[test]
    fn closing_menu_keeps_modal_scroll_lock() {
        let (mut nav, mut host) = controller();
        host.lock_scroll(ScrollLock::Modal);
        nav.toggle_mobile_menu(&mut host);
        nav.close_mobile_menu(&mut host);
        assert!(host.scroll_locked());
    }

    #[test]
    fn default_page_must_be_in_page_set() {
        let result = NavigationController::new(vec!["home".to_string()], "menu");
        assert!(matches!(result, Err(NavigationError::UnknownPage(_))));
        let result = NavigationController::new(vec![], "home");
        assert!(matches!(result, Err(NavigationError::NoPages)));
    }

    #[test]
    fn navbar_marked_scrolled_past_threshold() {
        let mut scroll = NavbarScroll::new();
        let mut host = HeadlessHost::new();
        scroll.on_scroll(SCROLLED_AFTER, &mut host);
        assert!(!host.has_flag(NAVBAR, SCROLLED));
        scroll.on_scroll(SCROLLED_AFTER + 1, &mut host);
        assert!(host.has_flag(NAVBAR, SCROLLED));
        scroll.on_scroll(0, &mut host);
        assert!(!host.has_flag(NAVBAR, SCROLLED));
    }

    #[test]
    fn navbar_hides_only_when_scrolling_down_past_limit() {
        let mut scroll = NavbarScroll::new();
        let mut host = HeadlessHost::new();

        scroll.on_scroll(80, &mut host);
        assert!(!scroll.is_hidden(), "still above the hide limit");

        scroll.on_scroll(300, &mut host);
        assert!(scroll.is_hidden());
        assert!(host.has_flag(NAVBAR, NAV_HIDDEN));

        scroll.on_scroll(250, &mut host);
        assert!(!scroll.is_hidden(), "scrolling up shows it again");
        assert!(!host.has_flag(NAVBAR, NAV_HIDDEN));

        scroll.on_scroll(250, &mut host);
        assert!(!scroll.is_hidden(), "no movement keeps it shown");
    }
}
