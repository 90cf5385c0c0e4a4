//! The App Shell: per-session context and event routing.
//!
//! [`App`] owns every controller plus the host. The host reports user input
//! as [`HostEvent`]s; [`App::dispatch`] resolves each one through the
//! [`Subscriptions`] table and runs the matching [`Handler`]. There is no
//! global state: two `App`s never see each other.
//!
//! ## Standard subscriptions
//!
//! | Event | Source | Handler |
//! |-------|--------|---------|
//! | activate | `navigate` | [`Handler::Navigate`] |
//! | activate | `toggle-menu` | [`Handler::ToggleMobileMenu`] |
//! | activate | `close-menu` | [`Handler::CloseMobileMenu`] |
//! | activate | `open-dish` | [`Handler::OpenDish`] |
//! | activate | `close-modal` | [`Handler::CloseModal`] |
//! | activate | `back-to-menu` | [`Handler::BackToMenu`] |
//! | activate | `dismiss-toast` | [`Handler::DismissToast`] |
//! | activate | `add-to-order` | [`Handler::AddToOrder`] |
//! | activate | `share-dish` | [`Handler::ShareDish`] |
//! | activate | `toggle-favorite` | [`Handler::ToggleFavorite`] |
//! | activate | `upload-image` | [`Handler::UploadImage`] |
//! | input | `menu-search` | [`Handler::Search`] |
//! | change | `category-filter` | [`Handler::FilterCategory`] |
//! | outside click | `navbar` | [`Handler::CloseMobileMenu`] |
//! | key | `Escape` | [`Handler::Escape`] |
//! | scroll | `window` | [`Handler::NavbarScroll`] |
//! | intersect | `viewport` | [`Handler::Reveal`] |
//! | timer | `timer` | [`Handler::TimerFired`] |
//!
//! `activate` sources are the `data-action` values the component builders
//! emit; the `data-target` travels along as the event target. The host
//! reports `intersect` for elements marked `data-reveal` as they first enter
//! the viewport.

use crate::actions::{self, ImageUploads};
use crate::catalog::{Catalog, DishRecord};
use crate::components::{self, ToastKind, ToastSpec};
use crate::config::SiteConfig;
use crate::favorites::Favorites;
use crate::host::{
    CATEGORY_FILTER, FADE_IN, HeadlessHost, Host, MENU_GRID, MENU_SEARCH, TimerTask,
};
use crate::navigation::{NavbarScroll, NavigationController, NavigationError};
use crate::overlay::{ModalController, ToastController};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tracing::{debug, warn};

/// Category filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

const TIMER_SOURCE: &str = "timer";
const NAVBAR_SOURCE: &str = "navbar";
const SCROLL_SOURCE: &str = "window";
const VIEWPORT_SOURCE: &str = "viewport";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Click, tap or Enter on an element with a `data-action`.
    Activate,
    Input,
    Change,
    /// Click anywhere outside the element named by the source.
    OutsideClick,
    Key,
    /// Page scroll position changed.
    Scroll,
    /// An observed element entered the viewport.
    Intersect,
    Timer,
}

/// Something the host observed.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Activate {
        action: String,
        target: Option<String>,
    },
    Input {
        source: String,
        value: String,
    },
    Change {
        source: String,
        value: String,
    },
    OutsideClick {
        source: String,
    },
    Key(String),
    /// Vertical scroll offset in pixels.
    Scroll {
        y: u32,
    },
    /// `element` is the host's handle for the observed `data-reveal`
    /// element, used again when the shell flags it.
    Intersect {
        element: String,
    },
    Timer(TimerTask),
}

impl HostEvent {
    pub fn activate(action: &str, target: &str) -> Self {
        HostEvent::Activate {
            action: action.to_string(),
            target: Some(target.to_string()),
        }
    }

    /// Activation with no `data-target`, e.g. the hamburger button.
    pub fn activate_bare(action: &str) -> Self {
        HostEvent::Activate {
            action: action.to_string(),
            target: None,
        }
    }

    pub fn input(source: &str, value: &str) -> Self {
        HostEvent::Input {
            source: source.to_string(),
            value: value.to_string(),
        }
    }

    pub fn change(source: &str, value: &str) -> Self {
        HostEvent::Change {
            source: source.to_string(),
            value: value.to_string(),
        }
    }

    pub fn outside_navbar() -> Self {
        HostEvent::OutsideClick {
            source: NAVBAR_SOURCE.to_string(),
        }
    }

    pub fn keypress(key: &str) -> Self {
        HostEvent::Key(key.to_string())
    }

    pub fn scroll(y: u32) -> Self {
        HostEvent::Scroll { y }
    }

    pub fn intersect(element: &str) -> Self {
        HostEvent::Intersect {
            element: element.to_string(),
        }
    }

    pub fn timer(task: TimerTask) -> Self {
        HostEvent::Timer(task)
    }

    /// The subscription-table key this event is looked up under.
    pub fn route(&self) -> (EventKind, &str) {
        match self {
            HostEvent::Activate { action, .. } => (EventKind::Activate, action),
            HostEvent::Input { source, .. } => (EventKind::Input, source),
            HostEvent::Change { source, .. } => (EventKind::Change, source),
            HostEvent::OutsideClick { source } => (EventKind::OutsideClick, source),
            HostEvent::Key(key) => (EventKind::Key, key),
            HostEvent::Scroll { .. } => (EventKind::Scroll, SCROLL_SOURCE),
            HostEvent::Intersect { .. } => (EventKind::Intersect, VIEWPORT_SOURCE),
            HostEvent::Timer(_) => (EventKind::Timer, TIMER_SOURCE),
        }
    }

    fn target(&self) -> Option<&str> {
        match self {
            HostEvent::Activate { target, .. } => target.as_deref(),
            HostEvent::Intersect { element } => Some(element),
            _ => None,
        }
    }

    fn value(&self) -> Option<&str> {
        match self {
            HostEvent::Input { value, .. } | HostEvent::Change { value, .. } => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Navigate,
    ToggleMobileMenu,
    CloseMobileMenu,
    OpenDish,
    CloseModal,
    /// Close the modal and go to the menu page.
    BackToMenu,
    DismissToast,
    AddToOrder,
    ShareDish,
    ToggleFavorite,
    /// Start the simulated image upload for a dish.
    UploadImage,
    Search,
    FilterCategory,
    /// Close the modal, or the mobile menu when no modal is open.
    Escape,
    /// Update the navbar's scrolled and hidden flags.
    NavbarScroll,
    /// Fade in an element that entered the viewport.
    Reveal,
    TimerFired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled(Handler),
    /// No subscription matched, or the event lacked what its handler needs.
    Ignored,
}

/// Explicit (event kind, source) → handler table.
#[derive(Debug, Clone, Default)]
pub struct Subscriptions {
    table: HashMap<(EventKind, String), Handler>,
}

impl Subscriptions {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table the generated site is wired for.
    pub fn standard() -> Self {
        use EventKind::*;
        let mut subs = Self::empty();
        subs.subscribe(Activate, "navigate", Handler::Navigate);
        subs.subscribe(Activate, "toggle-menu", Handler::ToggleMobileMenu);
        subs.subscribe(Activate, "close-menu", Handler::CloseMobileMenu);
        subs.subscribe(Activate, "open-dish", Handler::OpenDish);
        subs.subscribe(Activate, "close-modal", Handler::CloseModal);
        subs.subscribe(Activate, "back-to-menu", Handler::BackToMenu);
        subs.subscribe(Activate, "dismiss-toast", Handler::DismissToast);
        subs.subscribe(Activate, "add-to-order", Handler::AddToOrder);
        subs.subscribe(Activate, "share-dish", Handler::ShareDish);
        subs.subscribe(Activate, "toggle-favorite", Handler::ToggleFavorite);
        subs.subscribe(Activate, "upload-image", Handler::UploadImage);
        subs.subscribe(Input, MENU_SEARCH, Handler::Search);
        subs.subscribe(Change, CATEGORY_FILTER, Handler::FilterCategory);
        subs.subscribe(OutsideClick, NAVBAR_SOURCE, Handler::CloseMobileMenu);
        subs.subscribe(Key, "Escape", Handler::Escape);
        subs.subscribe(Scroll, SCROLL_SOURCE, Handler::NavbarScroll);
        subs.subscribe(Intersect, VIEWPORT_SOURCE, Handler::Reveal);
        subs.subscribe(Timer, TIMER_SOURCE, Handler::TimerFired);
        subs
    }

    /// Bind `source` events of `kind` to `handler`, replacing any previous
    /// binding.
    pub fn subscribe(&mut self, kind: EventKind, source: &str, handler: Handler) {
        self.table.insert((kind, source.to_string()), handler);
    }

    pub fn unsubscribe(&mut self, kind: EventKind, source: &str) -> Option<Handler> {
        self.table.remove(&(kind, source.to_string()))
    }

    pub fn lookup(&self, event: &HostEvent) -> Option<Handler> {
        let (kind, source) = event.route();
        self.table.get(&(kind, source.to_string())).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Current menu-grid query: free text plus an optional category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFilter {
    pub query: String,
    pub category: Option<String>,
}

impl MenuFilter {
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a DishRecord> {
        catalog
            .search(&self.query)
            .into_iter()
            .filter(|d| self.category.as_ref().is_none_or(|c| &d.category == c))
            .collect()
    }
}

/// One browsing session.
pub struct App<H: Host> {
    config: SiteConfig,
    catalog: Catalog,
    navigation: NavigationController,
    navbar: NavbarScroll,
    modal: ModalController,
    toasts: ToastController,
    favorites: Favorites,
    uploads: ImageUploads,
    subscriptions: Subscriptions,
    menu_filter: MenuFilter,
    host: H,
}

impl<H: Host> App<H> {
    /// Build a session and show the default page.
    pub fn new(config: SiteConfig, catalog: Catalog, mut host: H) -> Result<Self, NavigationError> {
        let navigation = NavigationController::new(
            config.navigation.pages.clone(),
            &config.navigation.default_page,
        )?;
        navigation.activate_initial(&mut host);
        let toasts = ToastController::new(config.toasts.duration(), config.toasts.exit());
        let favorites = Favorites::new(config.favorites.storage_key.as_str());
        Ok(Self {
            config,
            catalog,
            navigation,
            navbar: NavbarScroll::new(),
            modal: ModalController::new(),
            toasts,
            favorites,
            uploads: ImageUploads::new(),
            subscriptions: Subscriptions::standard(),
            menu_filter: MenuFilter::default(),
            host,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn navbar(&self) -> &NavbarScroll {
        &self.navbar
    }

    pub fn uploads(&self) -> &ImageUploads {
        &self.uploads
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn toasts(&self) -> &ToastController {
        &self.toasts
    }

    pub fn menu_filter(&self) -> &MenuFilter {
        &self.menu_filter
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn subscriptions_mut(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    pub fn favorite_ids(&self) -> BTreeSet<String> {
        self.favorites.load(&self.host)
    }

    /// Show an arbitrary toast, returning its id.
    pub fn show_toast(&mut self, spec: &ToastSpec) -> String {
        self.toasts.show(spec, &mut self.host)
    }

    pub fn dispatch(&mut self, event: HostEvent) -> Dispatch {
        let Some(handler) = self.subscriptions.lookup(&event) else {
            debug!(event = ?event.route(), "no subscription");
            return Dispatch::Ignored;
        };
        if self.run(handler, &event) {
            Dispatch::Handled(handler)
        } else {
            debug!(?handler, event = ?event.route(), "event missing target or value");
            Dispatch::Ignored
        }
    }

    /// Run `handler`. Returns false when the event lacks the target, value
    /// or payload the handler needs.
    fn run(&mut self, handler: Handler, event: &HostEvent) -> bool {
        match (handler, event.target()) {
            (Handler::ToggleMobileMenu, _) => {
                self.navigation.toggle_mobile_menu(&mut self.host);
            }
            (Handler::CloseMobileMenu, _) => self.navigation.close_mobile_menu(&mut self.host),
            (Handler::CloseModal, _) => self.modal.close(&mut self.host),
            (Handler::Escape, _) => {
                if self.modal.is_open() {
                    self.modal.close(&mut self.host);
                } else {
                    self.navigation.close_mobile_menu(&mut self.host);
                }
            }
            (Handler::BackToMenu, target) => {
                self.modal.close(&mut self.host);
                self.go_to(target.unwrap_or("menu"));
            }
            (Handler::Search, _) => {
                let Some(query) = event.value() else {
                    return false;
                };
                self.menu_filter.query = query.trim().to_string();
                self.render_menu();
            }
            (Handler::FilterCategory, _) => {
                let Some(value) = event.value() else {
                    return false;
                };
                self.menu_filter.category = match value {
                    "" | ALL_CATEGORIES => None,
                    category => Some(category.to_string()),
                };
                self.render_menu();
            }
            (Handler::NavbarScroll, _) => {
                let HostEvent::Scroll { y } = event else {
                    return false;
                };
                self.navbar.on_scroll(*y, &mut self.host);
            }
            (Handler::TimerFired, _) => {
                let HostEvent::Timer(task) = event else {
                    return false;
                };
                self.fire(task);
            }
            (Handler::Navigate, Some(page)) => self.go_to(page),
            (Handler::OpenDish, Some(id)) => self.modal.open(id, &self.catalog, &mut self.host),
            (Handler::DismissToast, Some(id)) => {
                self.toasts.dismiss(id, &mut self.host);
            }
            (Handler::AddToOrder, Some(id)) => {
                actions::add_to_order(&self.catalog, id, &mut self.toasts, &mut self.host);
            }
            (Handler::ShareDish, Some(id)) => {
                actions::share_dish(
                    &self.catalog,
                    &self.config.site,
                    id,
                    &mut self.toasts,
                    &mut self.host,
                );
            }
            (Handler::ToggleFavorite, Some(id)) => {
                actions::toggle_favorite(
                    &self.catalog,
                    &self.favorites,
                    id,
                    &mut self.toasts,
                    &mut self.host,
                );
            }
            (Handler::UploadImage, Some(id)) => {
                self.uploads.start(&self.catalog, id, &mut self.host);
            }
            (Handler::Reveal, Some(element)) => self.host.set_flag(element, FADE_IN, true),
            (
                Handler::Navigate
                | Handler::OpenDish
                | Handler::DismissToast
                | Handler::AddToOrder
                | Handler::ShareDish
                | Handler::ToggleFavorite
                | Handler::UploadImage
                | Handler::Reveal,
                None,
            ) => return false,
        }
        true
    }

    fn fire(&mut self, task: &TimerTask) {
        match task {
            TimerTask::DismissToast(_) | TimerTask::RemoveToastElement(_) => {
                self.toasts.fire(task, &mut self.host);
            }
            TimerTask::FinishImageUpload(id) => {
                self.uploads.finish(id, &mut self.toasts, &mut self.host);
            }
        }
    }

    fn go_to(&mut self, page: &str) {
        if let Err(e) = self.navigation.navigate(page, &mut self.host) {
            warn!(page = %page, error = %e, "navigation failed");
            let spec = ToastSpec::new(ToastKind::Error, "Page not found").message(e.to_string());
            self.toasts.show(&spec, &mut self.host);
        }
    }

    fn render_menu(&mut self) {
        let matches = self.menu_filter.apply(&self.catalog);
        debug!(
            query = %self.menu_filter.query,
            category = ?self.menu_filter.category,
            results = matches.len(),
            "render menu grid"
        );
        let grid = components::dish_grid(matches);
        self.host.mount(MENU_GRID, grid);
    }
}

impl App<HeadlessHost> {
    /// Move the virtual clock forward by `by`, dispatching every timer that
    /// comes due on the way.
    pub fn advance(&mut self, by: Duration) {
        let until = self.host.now() + by;
        while let Some(task) = self.host.pop_due(until) {
            self.dispatch(HostEvent::timer(task));
        }
        self.host.settle(until);
    }
}
