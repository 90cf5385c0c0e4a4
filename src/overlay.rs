//! Modal and toast controllers.
//!
//! The dish modal is a single element (`#dish-modal`) whose body is replaced
//! on every open. Toasts stack in `#toast-container` and leave in two
//! timed steps: [`ToastController::dismiss`] flags the element for its exit
//! animation, and a follow-up [`TimerTask::RemoveToastElement`] removes it.
//!
//! ```text
//! show ──(duration)──▶ DismissToast ──▶ dismiss ──(exit)──▶ RemoveToastElement
//!                                         ▲
//!                            close button ┘
//! ```
//!
//! Timer tasks carry a [`ToastTicket`]; a task whose ticket no longer matches
//! a live toast is ignored, so late or duplicate timers are harmless.

use crate::catalog::Catalog;
use crate::components::{self, ToastKind, ToastSpec, fresh_toast_id, modal_body_id, toast_element_id};
use crate::detail;
use crate::host::{
    ACTIVE, DISH_MODAL, ScrollLock, Surface, TOAST_CONTAINER, TOAST_EXIT, TimerTask, Timers,
    ToastTicket,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);
pub const DEFAULT_TOAST_EXIT: Duration = Duration::from_millis(300);

// ============================================================================
// Modal
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    /// Showing the detail view of this dish id.
    Open(String),
}

#[derive(Debug, Default)]
pub struct ModalController {
    state: ModalState,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    /// Show the detail view for `dish_id`. An unknown id still opens the
    /// modal, with the not-found fragment as its body. Opening while already
    /// open replaces the body.
    pub fn open(&mut self, dish_id: &str, catalog: &Catalog, surface: &mut impl Surface) {
        surface.mount(&modal_body_id(DISH_MODAL), detail::render_detail(catalog, dish_id, ""));
        surface.set_flag(DISH_MODAL, ACTIVE, true);
        surface.lock_scroll(ScrollLock::Modal);
        debug!(dish = %dish_id, found = catalog.contains(dish_id), "open dish modal");
        self.state = ModalState::Open(dish_id.to_string());
    }

    pub fn close(&mut self, surface: &mut impl Surface) {
        surface.set_flag(DISH_MODAL, ACTIVE, false);
        surface.release_scroll(ScrollLock::Modal);
        if self.is_open() {
            debug!("close dish modal");
        }
        self.state = ModalState::Closed;
    }
}

// ============================================================================
// Toasts
// ============================================================================

/// A toast currently on screen and not yet dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastEntry {
    pub id: String,
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
    /// `None` for sticky toasts.
    pub duration: Option<Duration>,
    serial: u64,
}

impl ToastEntry {
    fn ticket(&self) -> ToastTicket {
        ToastTicket::new(&self.id, self.serial)
    }
}

#[derive(Debug)]
pub struct ToastController {
    queue: Vec<ToastEntry>,
    /// Dismissed toasts still playing their exit animation, by id.
    exiting: HashMap<String, u64>,
    next_serial: u64,
    default_duration: Duration,
    exit_duration: Duration,
}

impl Default for ToastController {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION, DEFAULT_TOAST_EXIT)
    }
}

impl ToastController {
    pub fn new(default_duration: Duration, exit_duration: Duration) -> Self {
        Self {
            queue: Vec::new(),
            exiting: HashMap::new(),
            next_serial: 1,
            default_duration,
            exit_duration,
        }
    }

    /// Live toasts in the order they were shown.
    pub fn queue(&self) -> &[ToastEntry] {
        &self.queue
    }

    pub fn is_showing(&self, id: &str) -> bool {
        self.queue.iter().any(|t| t.id == id)
    }

    /// Show a toast and return its id.
    ///
    /// A missing `duration_ms` uses the controller default; `Some(0)` makes
    /// the toast sticky. Reusing the id of a toast that is still around
    /// replaces it.
    pub fn show(&mut self, spec: &ToastSpec, host: &mut (impl Surface + Timers)) -> String {
        let id = spec.id.clone().unwrap_or_else(fresh_toast_id);
        self.discard(&id, host);

        let duration = match spec.duration_ms {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => Some(self.default_duration),
        };
        let entry = ToastEntry {
            id: id.clone(),
            kind: spec.kind,
            title: spec.title.clone(),
            message: spec.message.clone(),
            duration,
            serial: self.next_serial,
        };
        self.next_serial += 1;

        host.append(TOAST_CONTAINER, components::toast(spec, &id));
        if let Some(delay) = duration {
            host.after(delay, TimerTask::DismissToast(entry.ticket()));
        }
        debug!(toast = %id, kind = ?spec.kind, title = %spec.title, "show toast");
        self.queue.push(entry);
        id
    }

    /// Start the exit of toast `id`. Returns false when no such toast is
    /// showing (never shown, or already dismissed).
    pub fn dismiss(&mut self, id: &str, host: &mut (impl Surface + Timers)) -> bool {
        let Some(pos) = self.queue.iter().position(|t| t.id == id) else {
            return false;
        };
        let entry = self.queue.remove(pos);
        host.set_flag(&toast_element_id(id), TOAST_EXIT, true);
        host.after(self.exit_duration, TimerTask::RemoveToastElement(entry.ticket()));
        self.exiting.insert(entry.id, entry.serial);
        debug!(toast = %id, "dismiss toast");
        true
    }

    /// Handle a fired timer. Tasks for toasts that are gone, and tasks that
    /// are not toast timers, are ignored.
    pub fn fire(&mut self, task: &TimerTask, host: &mut (impl Surface + Timers)) {
        match task {
            TimerTask::DismissToast(ticket) => {
                if self.queue.iter().any(|t| t.ticket() == *ticket) {
                    self.dismiss(&ticket.id, host);
                }
            }
            TimerTask::RemoveToastElement(ticket) => {
                if self.exiting.get(&ticket.id) == Some(&ticket.serial) {
                    self.exiting.remove(&ticket.id);
                    host.remove(&toast_element_id(&ticket.id));
                }
            }
            TimerTask::FinishImageUpload(_) => {}
        }
    }

    /// Drop any earlier toast with `id` immediately, without an exit
    /// animation.
    fn discard(&mut self, id: &str, surface: &mut impl Surface) {
        let live = self.queue.len();
        self.queue.retain(|t| t.id != id);
        let was_live = self.queue.len() != live;
        let was_exiting = self.exiting.remove(id).is_some();
        if was_live || was_exiting {
            surface.remove(&toast_element_id(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;

    fn run_until(toasts: &mut ToastController, host: &mut HeadlessHost, ms: u64) {
        let until = Duration::from_millis(ms);
        while let Some(task) = host.pop_due(until) {
            toasts.fire(&task, host);
        }
        host.settle(until);
    }

    fn toast_ids(toasts: &ToastController) -> Vec<&str> {
        toasts.queue().iter().map(|t| t.id.as_str()).collect()
    }

    // =========================================================================
    // Modal
    // =========================================================================

    #[test]
    fn modal_open_mounts_detail_and_locks_scroll() {
        let catalog = Catalog::builtin().unwrap();
        let mut host = HeadlessHost::new();
        let mut modal = ModalController::new();

        modal.open("ceviche-tropical", &catalog, &mut host);

        assert_eq!(modal.state(), &ModalState::Open("ceviche-tropical".into()));
        assert!(host.has_flag(DISH_MODAL, ACTIVE));
        assert!(host.scroll_locked());
        let body = host.content("dish-modal-body").unwrap();
        assert!(body.contains("Ceviche Tropical Ivory"));
    }

    #[test]
    fn modal_open_unknown_dish_shows_not_found() {
        let catalog = Catalog::builtin().unwrap();
        let mut host = HeadlessHost::new();
        let mut modal = ModalController::new();

        modal.open("missing-id", &catalog, &mut host);

        assert!(modal.is_open());
        assert!(host.has_flag(DISH_MODAL, ACTIVE));
        assert!(host.content("dish-modal-body").unwrap().contains("Dish not found"));
    }

    #[test]
    fn modal_close_always_ends_closed() {
        let catalog = Catalog::builtin().unwrap();
        let mut host = HeadlessHost::new();
        let mut modal = ModalController::new();

        modal.close(&mut host);
        assert_eq!(modal.state(), &ModalState::Closed);

        modal.open("ceviche-tropical", &catalog, &mut host);
        modal.close(&mut host);
        modal.close(&mut host);
        assert_eq!(modal.state(), &ModalState::Closed);
        assert!(!host.has_flag(DISH_MODAL, ACTIVE));
        assert!(!host.scroll_locked());
    }

    #[test]
    fn reopening_replaces_body() {
        let catalog = Catalog::builtin().unwrap();
        let mut host = HeadlessHost::new();
        let mut modal = ModalController::new();

        modal.open("ceviche-tropical", &catalog, &mut host);
        modal.open("pargo-rojo-grillado", &catalog, &mut host);

        let body = host.content("dish-modal-body").unwrap();
        assert!(body.contains("Pargo Rojo Grillado Caribe"));
        assert!(!body.contains("Ceviche Tropical Ivory"));
        assert_eq!(modal.state(), &ModalState::Open("pargo-rojo-grillado".into()));
    }

    // =========================================================================
    // Toasts
    // =========================================================================

    #[test]
    fn toast_auto_dismisses_after_default_duration() {
        let mut host = HeadlessHost::new();
        let mut toasts = ToastController::default();

        let id = toasts.show(&ToastSpec::new(ToastKind::Info, "Hi"), &mut host);
        assert!(host.content(TOAST_CONTAINER).unwrap().contains("Hi"));

        run_until(&mut toasts, &mut host, 4999);
        assert!(toasts.is_showing(&id));

        run_until(&mut toasts, &mut host, 5000);
        assert!(!toasts.is_showing(&id));
        assert!(host.has_flag(&toast_element_id(&id), TOAST_EXIT));
        assert!(host.removed().is_empty());

        run_until(&mut toasts, &mut host, 5300);
        assert_eq!(host.removed(), [toast_element_id(&id)]);
    }

    #[test]
    fn zero_duration_toast_is_sticky() {
        let mut host = HeadlessHost::new();
        let mut toasts = ToastController::default();

        let spec = ToastSpec::new(ToastKind::Warning, "Stay").duration_ms(0);
        let id = toasts.show(&spec, &mut host);

        assert!(host.pending_timers().is_empty());
        run_until(&mut toasts, &mut host, 60_000);
        assert!(toasts.is_showing(&id));
        assert_eq!(toasts.queue()[0].duration, None);
    }

    #[test]
    fn explicit_duration_overrides_default() {
        let mut host = HeadlessHost::new();
        let mut toasts = ToastController::default();

        let id = toasts.show(&ToastSpec::new(ToastKind::Success, "Quick").duration_ms(1000), &mut host);
        run_until(&mut toasts, &mut host, 1000);
        assert!(!toasts.is_showing(&id));
    }

    #[test]
    fn dismiss_unknown_or_twice_is_a_no_op() {
        let mut host = HeadlessHost::new();
        let mut toasts = ToastController::default();

        assert!(!toasts.dismiss("never-shown", &mut host));

        let id = toasts.show(&ToastSpec::new(ToastKind::Info, "Once"), &mut host);
        assert!(toasts.dismiss(&id, &mut host));
        assert!(!toasts.dismiss(&id, &mut host));

        // Auto-dismiss timer fires after the manual dismiss: nothing happens
        // beyond the single removal.
        run_until(&mut toasts, &mut host, 10_000);
        assert_eq!(host.removed(), [toast_element_id(&id)]);
    }

    #[test]
    fn queue_keeps_show_order() {
        let mut host = HeadlessHost::new();
        let mut toasts = ToastController::default();

        for id in ["a", "b", "c"] {
            let spec = ToastSpec {
                id: Some(id.to_string()),
                ..ToastSpec::new(ToastKind::Info, id)
            };
            toasts.show(&spec, &mut host);
        }
        toasts.dismiss("b", &mut host);
        assert_eq!(toast_ids(&toasts), vec!["a", "c"]);
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut host = HeadlessHost::new();
        let mut toasts = ToastController::default();

        let first = toasts.show(&ToastSpec::new(ToastKind::Info, "One"), &mut host);
        let second = toasts.show(&ToastSpec::new(ToastKind::Info, "Two"), &mut host);
        assert_ne!(first, second);
        assert_eq!(toasts.queue().len(), 2);
    }

    #[test]
    fn reused_id_replaces_and_ignores_stale_timers() {
        let mut host = HeadlessHost::new();
        let mut toasts = ToastController::default();
        let spec = |title: &str, ms: u64| ToastSpec {
            id: Some("saved".to_string()),
            ..ToastSpec::new(ToastKind::Success, title).duration_ms(ms)
        };

        toasts.show(&spec("First", 1000), &mut host);
        run_until(&mut toasts, &mut host, 500);
        toasts.show(&spec("Second", 5000), &mut host);

        assert_eq!(toast_ids(&toasts), vec!["saved"]);
        assert_eq!(toasts.queue()[0].title, "Second");

        // The first toast's 1000 ms timer must not dismiss the replacement.
        run_until(&mut toasts, &mut host, 2000);
        assert!(toasts.is_showing("saved"));

        run_until(&mut toasts, &mut host, 5500);
        assert!(!toasts.is_showing("saved"));
    }

    #[test]
    fn reusing_id_during_exit_drops_old_element_immediately() {
        let mut host = HeadlessHost::new();
        let mut toasts = ToastController::default();
        let spec = ToastSpec {
            id: Some("x".to_string()),
            ..ToastSpec::new(ToastKind::Info, "X")
        };

        toasts.show(&spec, &mut host);
        toasts.dismiss("x", &mut host);
        toasts.show(&spec, &mut host);
        assert_eq!(host.removed(), ["toast-x"]);

        // The old exit timer fires; the new toast's element stays.
        run_until(&mut toasts, &mut host, 400);
        assert_eq!(host.removed(), ["toast-x"]);
        assert!(toasts.is_showing("x"));
    }

    #[test]
    fn custom_exit_duration() {
        let mut host = HeadlessHost::new();
        let mut toasts =
            ToastController::new(Duration::from_millis(100), Duration::from_millis(50));

        let id = toasts.show(&ToastSpec::new(ToastKind::Error, "Oops"), &mut host);
        run_until(&mut toasts, &mut host, 149);
        assert!(host.removed().is_empty());
        run_until(&mut toasts, &mut host, 150);
        assert_eq!(host.removed(), [toast_element_id(&id)]);
    }
}
