//! Host collaborators: the rendering surface, timers, key-value storage and
//! the share sheet.
//!
//! The core never touches a browser directly. Controllers receive a host
//! through these traits, which keeps every controller testable without a
//! real DOM. Two implementations ship with the crate:
//!
//! - [`HeadlessHost`] records everything it is asked to do and runs timers on
//!   a manual virtual clock. Tests and embedders without a browser use it.
//! - [`FileStore`] is a JSON-file-backed [`KeyValueStore`] the CLI uses for
//!   favorites.
//!
//! ## Element ids
//!
//! The site shell (see [`crate::generate`]) renders the elements the
//! controllers address. Their ids live here so both sides agree.

use maud::Markup;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub const DISH_MODAL: &str = "dish-modal";
pub const TOAST_CONTAINER: &str = "toast-container";
pub const MENU_GRID: &str = "menu-grid";
pub const NAV_HAMBURGER: &str = "nav-hamburger";
pub const NAV_MENU: &str = "nav-menu";
pub const MENU_SEARCH: &str = "menu-search";
pub const CATEGORY_FILTER: &str = "category-filter";
pub const NAVBAR: &str = "navbar";
/// Body-level container for overlays that cover the whole page.
pub const OVERLAY_ROOT: &str = "overlay-root";
pub const LOADING_OVERLAY: &str = "loading-overlay";

/// State flag toggled on pages, nav links, the menu and the modal.
pub const ACTIVE: &str = "active";
/// State flag marking a toast that is playing its exit animation.
pub const TOAST_EXIT: &str = "toast-exit";
/// Navbar flag once the page is scrolled away from the top.
pub const SCROLLED: &str = "scrolled";
/// Navbar flag while it is slid out of view.
pub const NAV_HIDDEN: &str = "nav-hidden";
/// Flag on a revealed element once it has entered the viewport.
pub const FADE_IN: &str = "fade-in";

pub fn page_section_id(page: &str) -> String {
    format!("{page}-page")
}

pub fn nav_link_id(page: &str) -> String {
    format!("nav-link-{page}")
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShareError {
    #[error("Share service unavailable: {0}")]
    Unavailable(String),
}

/// Who is holding the page scroll lock. The body stays locked while any
/// holder remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScrollLock {
    MobileMenu,
    Modal,
}

/// One showing of a toast. The serial tells apart two toasts that reuse the
/// same caller-supplied id, so a timer left over from the first never acts on
/// the second.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToastTicket {
    pub id: String,
    pub serial: u64,
}

impl ToastTicket {
    pub fn new(id: impl Into<String>, serial: u64) -> Self {
        Self {
            id: id.into(),
            serial,
        }
    }
}

/// Deferred work handed to [`Timers::after`] and fed back to the shell when
/// it fires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerTask {
    /// Auto-dismiss a toast.
    DismissToast(ToastTicket),
    /// Remove a dismissed toast's element once its exit animation is over.
    RemoveToastElement(ToastTicket),
    /// Finish the simulated image upload for a dish.
    FinishImageUpload(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub url: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The platform share sheet took the request.
    Shared,
    /// No share sheet; the URL went to the clipboard instead.
    Copied,
}

pub trait Surface {
    /// Replace the children of `target` with `fragment`.
    fn mount(&mut self, target: &str, fragment: Markup);
    /// Append `fragment` as the last child of `target`.
    fn append(&mut self, target: &str, fragment: Markup);
    fn remove(&mut self, element: &str);
    fn set_flag(&mut self, element: &str, flag: &str, on: bool);
    fn lock_scroll(&mut self, holder: ScrollLock);
    fn release_scroll(&mut self, holder: ScrollLock);
    fn scroll_to_top(&mut self);
}

pub trait Timers {
    fn after(&mut self, delay: Duration, task: TimerTask);
}

pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

pub trait ShareService {
    /// Best effort: share through the platform, else copy the URL.
    fn share_or_copy(&mut self, request: &ShareRequest) -> Result<ShareOutcome, ShareError>;
}

/// Everything the App Shell needs from its environment.
pub trait Host: Surface + Timers + KeyValueStore + ShareService {}

impl<T: Surface + Timers + KeyValueStore + ShareService> Host for T {}

// ============================================================================
// Headless host
// ============================================================================

/// How [`HeadlessHost`] answers share requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShareMode {
    Native,
    #[default]
    Clipboard,
    Unavailable,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    due: Duration,
    seq: u64,
    task: TimerTask,
}

/// In-memory host with a manual clock.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    content: HashMap<String, String>,
    flags: HashMap<String, BTreeSet<String>>,
    removed: Vec<String>,
    scroll_holders: BTreeSet<ScrollLock>,
    scroll_to_top_count: usize,
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTimer>,
    store: HashMap<String, String>,
    storage_down: bool,
    share_mode: ShareMode,
    shared: Vec<ShareRequest>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markup inside `target`, if anything was mounted there.
    pub fn content(&self, target: &str) -> Option<&str> {
        self.content.get(target).map(String::as_str)
    }

    pub fn has_flag(&self, element: &str, flag: &str) -> bool {
        self.flags
            .get(element)
            .is_some_and(|flags| flags.contains(flag))
    }

    /// Elements currently carrying `flag`, sorted.
    pub fn flagged(&self, flag: &str) -> Vec<&str> {
        let mut elements: Vec<&str> = self
            .flags
            .iter()
            .filter(|(_, flags)| flags.contains(flag))
            .map(|(element, _)| element.as_str())
            .collect();
        elements.sort_unstable();
        elements
    }

    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    pub fn scroll_locked(&self) -> bool {
        !self.scroll_holders.is_empty()
    }

    pub fn scroll_to_top_count(&self) -> usize {
        self.scroll_to_top_count
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_timers(&self) -> Vec<&TimerTask> {
        self.pending.iter().map(|p| &p.task).collect()
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time. Timers scheduled while handling a popped task are
    /// eligible on the next call.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerTask> {
        let (pos, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.seq))?;
        let timer = self.pending.remove(pos);
        self.now = self.now.max(timer.due);
        Some(timer.task)
    }

    /// Move the clock forward to `until` without firing anything.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    pub fn set_storage_available(&mut self, available: bool) {
        self.storage_down = !available;
    }

    /// Write a raw value, bypassing availability, e.g. to plant corrupt data.
    pub fn put_raw(&mut self, key: &str, value: &str) {
        self.store.insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.store.get(key).map(String::as_str)
    }

    pub fn set_share_mode(&mut self, mode: ShareMode) {
        self.share_mode = mode;
    }

    pub fn shared(&self) -> &[ShareRequest] {
        &self.shared
    }
}

impl Surface for HeadlessHost {
    fn mount(&mut self, target: &str, fragment: Markup) {
        self.content.insert(target.to_string(), fragment.into_string());
    }

    fn append(&mut self, target: &str, fragment: Markup) {
        self.content
            .entry(target.to_string())
            .or_default()
            .push_str(&fragment.into_string());
    }

    fn remove(&mut self, element: &str) {
        self.flags.remove(element);
        self.removed.push(element.to_string());
    }

    fn set_flag(&mut self, element: &str, flag: &str, on: bool) {
        let flags = self.flags.entry(element.to_string()).or_default();
        if on {
            flags.insert(flag.to_string());
        } else {
            flags.remove(flag);
        }
    }

    fn lock_scroll(&mut self, holder: ScrollLock) {
        self.scroll_holders.insert(holder);
    }

    fn release_scroll(&mut self, holder: ScrollLock) {
        self.scroll_holders.remove(&holder);
    }

    fn scroll_to_top(&mut self) {
        self.scroll_to_top_count += 1;
    }
}

impl Timers for HeadlessHost {
    fn after(&mut self, delay: Duration, task: TimerTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingTimer {
            due: self.now + delay,
            seq,
            task,
        });
    }
}

impl KeyValueStore for HeadlessHost {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.storage_down {
            return Err(StorageError::Unavailable("storage disabled".into()));
        }
        Ok(self.store.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.storage_down {
            return Err(StorageError::Unavailable("storage disabled".into()));
        }
        self.store.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl ShareService for HeadlessHost {
    fn share_or_copy(&mut self, request: &ShareRequest) -> Result<ShareOutcome, ShareError> {
        let outcome = match self.share_mode {
            ShareMode::Native => ShareOutcome::Shared,
            ShareMode::Clipboard => ShareOutcome::Copied,
            ShareMode::Unavailable => {
                return Err(ShareError::Unavailable("no share sheet or clipboard".into()));
            }
        };
        self.shared.push(request.clone());
        Ok(outcome)
    }
}

// ============================================================================
// File store
// ============================================================================

/// A [`KeyValueStore`] persisted as one JSON object on disk.
///
/// The file is re-read on every access, so two stores pointed at the same
/// path see each other's writes. Concurrent writers are last-writer-wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StorageError::Unavailable(e.to_string())),
        };
        match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StorageError::Unavailable(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.load()?;
        Ok(map.get(key).and_then(Value::as_str).map(str::to_string))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.load().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "replacing unreadable store file");
            Map::new()
        });
        map.insert(key.to_string(), Value::String(value.to_string()));
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}
