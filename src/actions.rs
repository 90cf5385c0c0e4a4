//! Dish actions behind the detail view: add to order, share, favorite, and
//! image upload.
//!
//! Each action confirms itself with a short toast. Ordering and uploading
//! are placeholders: they log and confirm but record nothing. Unknown dish
//! ids are ignored.

use crate::catalog::Catalog;
use crate::components::{self, ToastKind, ToastSpec};
use crate::config::SiteInfo;
use crate::favorites::{FavoriteChange, Favorites};
use crate::host::{
    Host, LOADING_OVERLAY, OVERLAY_ROOT, ShareOutcome, ShareRequest, Surface, TimerTask, Timers,
};
use std::time::Duration;
use crate::overlay::ToastController;
use tracing::{debug, info, warn};

/// Display time for action confirmations.
pub const ACTION_TOAST_MS: u64 = 3000;

/// How long a simulated image upload takes.
pub const UPLOAD_DELAY: Duration = Duration::from_millis(2000);
pub const UPLOAD_MESSAGE: &str = "Uploading image...";

fn confirmation(kind: ToastKind, title: &str, message: &str) -> ToastSpec {
    ToastSpec::new(kind, title)
        .message(message)
        .duration_ms(ACTION_TOAST_MS)
}

/// Link that opens the site with `id`'s detail view.
pub fn share_url(site: &SiteInfo, id: &str) -> String {
    format!("{}/?dish={id}", site.origin)
}

pub fn add_to_order(
    catalog: &Catalog,
    id: &str,
    toasts: &mut ToastController,
    host: &mut impl Host,
) -> bool {
    if !catalog.contains(id) {
        debug!(dish = %id, "add to order: unknown dish");
        return false;
    }
    info!(dish = %id, "added to order");
    toasts.show(
        &confirmation(
            ToastKind::Success,
            "Added to Order!",
            "Dish has been added to your order.",
        ),
        host,
    );
    true
}

/// Hand the dish link to the share sheet, or the clipboard when there is
/// none. Returns `None` for unknown dishes and when sharing failed.
pub fn share_dish(
    catalog: &Catalog,
    site: &SiteInfo,
    id: &str,
    toasts: &mut ToastController,
    host: &mut impl Host,
) -> Option<ShareOutcome> {
    let Ok(dish) = catalog.get(id) else {
        debug!(dish = %id, "share: unknown dish");
        return None;
    };
    let request = ShareRequest {
        url: share_url(site, id),
        title: format!("{} - {}", dish.name, site.name),
        text: dish.short_description.clone(),
    };

    match host.share_or_copy(&request) {
        Ok(ShareOutcome::Shared) => {
            debug!(dish = %id, "shared via share sheet");
            Some(ShareOutcome::Shared)
        }
        Ok(ShareOutcome::Copied) => {
            toasts.show(
                &confirmation(
                    ToastKind::Success,
                    "Link Copied!",
                    "Share link copied to clipboard.",
                ),
                host,
            );
            Some(ShareOutcome::Copied)
        }
        Err(e) => {
            warn!(dish = %id, error = %e, "could not share dish");
            toasts.show(
                &confirmation(ToastKind::Warning, "Could not share", &request.url),
                host,
            );
            None
        }
    }
}

pub fn toggle_favorite(
    catalog: &Catalog,
    favorites: &Favorites,
    id: &str,
    toasts: &mut ToastController,
    host: &mut impl Host,
) -> Option<FavoriteChange> {
    if !catalog.contains(id) {
        debug!(dish = %id, "favorite: unknown dish");
        return None;
    }
    let change = favorites.toggle(host, id);
    let spec = match change {
        FavoriteChange::Added => confirmation(
            ToastKind::Success,
            "Added to Favorites!",
            "Dish saved to your favorites.",
        ),
        FavoriteChange::Removed => confirmation(
            ToastKind::Info,
            "Removed from Favorites",
            "Dish removed from your favorites.",
        ),
    };
    toasts.show(&spec, host);
    Some(change)
}

/// Simulated image uploads. The page-wide loading overlay stays up while
/// any upload is in flight.
#[derive(Debug, Default)]
pub struct ImageUploads {
    in_flight: usize,
}

impl ImageUploads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start an upload for `id`: show the loading overlay and schedule
    /// [`TimerTask::FinishImageUpload`]. Returns false for unknown dishes.
    pub fn start(
        &mut self,
        catalog: &Catalog,
        id: &str,
        host: &mut (impl Surface + Timers),
    ) -> bool {
        if !catalog.contains(id) {
            debug!(dish = %id, "upload: unknown dish");
            return false;
        }
        if self.in_flight == 0 {
            host.append(OVERLAY_ROOT, components::loading_overlay(UPLOAD_MESSAGE));
        }
        self.in_flight += 1;
        host.after(UPLOAD_DELAY, TimerTask::FinishImageUpload(id.to_string()));
        debug!(dish = %id, in_flight = self.in_flight, "image upload started");
        true
    }

    /// Complete an upload: confirm it, and drop the overlay when it was the
    /// last one. A finish with nothing in flight is ignored.
    pub fn finish(
        &mut self,
        id: &str,
        toasts: &mut ToastController,
        host: &mut (impl Surface + Timers),
    ) {
        if self.in_flight == 0 {
            debug!(dish = %id, "upload finished with none in flight");
            return;
        }
        self.in_flight -= 1;
        if self.in_flight == 0 {
            host.remove(LOADING_OVERLAY);
        }
        info!(dish = %id, "image uploaded");
        toasts.show(
            &confirmation(
                ToastKind::Success,
                "Image Uploaded!",
                "Dish image has been updated.",
            ),
            host,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HeadlessHost, ShareMode, TOAST_CONTAINER};

    struct Fixture {
        catalog: Catalog,
        site: SiteInfo,
        toasts: ToastController,
        host: HeadlessHost,
    }

    fn fixture() -> Fixture {
        Fixture {
            catalog: Catalog::builtin().unwrap(),
            site: SiteInfo::default(),
            toasts: ToastController::default(),
            host: HeadlessHost::new(),
        }
    }

    fn titles(toasts: &ToastController) -> Vec<&str> {
        toasts.queue().iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn add_to_order_confirms_with_short_toast() {
        let mut f = fixture();
        assert!(add_to_order(&f.catalog, "ceviche-tropical", &mut f.toasts, &mut f.host));
        assert_eq!(titles(&f.toasts), vec!["Added to Order!"]);
        assert_eq!(
            f.toasts.queue()[0].duration,
            Some(std::time::Duration::from_millis(ACTION_TOAST_MS))
        );
    }

    #[test]
    fn unknown_dish_actions_do_nothing() {
        let mut f = fixture();
        let favorites = Favorites::default();
        assert!(!add_to_order(&f.catalog, "nope", &mut f.toasts, &mut f.host));
        assert_eq!(share_dish(&f.catalog, &f.site, "nope", &mut f.toasts, &mut f.host), None);
        assert_eq!(
            toggle_favorite(&f.catalog, &favorites, "nope", &mut f.toasts, &mut f.host),
            None
        );
        assert!(f.toasts.queue().is_empty());
        assert!(f.host.shared().is_empty());
        assert!(f.host.content(TOAST_CONTAINER).is_none());
    }

    #[test]
    fn share_builds_request_from_dish_and_site() {
        let mut f = fixture();
        let outcome = share_dish(&f.catalog, &f.site, "pargo-rojo-grillado", &mut f.toasts, &mut f.host);
        assert_eq!(outcome, Some(ShareOutcome::Copied));
        assert_eq!(
            f.host.shared(),
            [ShareRequest {
                url: "https://theivory.example/?dish=pargo-rojo-grillado".to_string(),
                title: "Pargo Rojo Grillado Caribe - The Ivory Restaurant".to_string(),
                text: "Grilled red snapper with Caribbean herbs".to_string(),
            }]
        );
        assert_eq!(titles(&f.toasts), vec!["Link Copied!"]);
    }

    #[test]
    fn native_share_shows_no_toast() {
        let mut f = fixture();
        f.host.set_share_mode(ShareMode::Native);
        let outcome = share_dish(&f.catalog, &f.site, "ceviche-tropical", &mut f.toasts, &mut f.host);
        assert_eq!(outcome, Some(ShareOutcome::Shared));
        assert!(f.toasts.queue().is_empty());
    }

    #[test]
    fn share_failure_surfaces_warning_with_link() {
        let mut f = fixture();
        f.host.set_share_mode(ShareMode::Unavailable);
        let outcome = share_dish(&f.catalog, &f.site, "ceviche-tropical", &mut f.toasts, &mut f.host);
        assert_eq!(outcome, None);
        let entry = &f.toasts.queue()[0];
        assert_eq!(entry.kind, ToastKind::Warning);
        assert_eq!(
            entry.message.as_deref(),
            Some("https://theivory.example/?dish=ceviche-tropical")
        );
    }

    #[test]
    fn toggle_favorite_alternates_toasts() {
        let mut f = fixture();
        let favorites = Favorites::default();
        let id = "sancocho-de-gallina";

        assert_eq!(
            toggle_favorite(&f.catalog, &favorites, id, &mut f.toasts, &mut f.host),
            Some(FavoriteChange::Added)
        );
        assert_eq!(
            toggle_favorite(&f.catalog, &favorites, id, &mut f.toasts, &mut f.host),
            Some(FavoriteChange::Removed)
        );
        assert_eq!(
            titles(&f.toasts),
            vec!["Added to Favorites!", "Removed from Favorites"]
        );
        assert!(favorites.load(&f.host).is_empty());
    }

    #[test]
    fn upload_shows_overlay_then_confirms() {
        let mut f = fixture();
        let mut uploads = ImageUploads::new();
        assert!(uploads.start(&f.catalog, "ceviche-tropical", &mut f.host));
        assert!(f.host.content(OVERLAY_ROOT).unwrap().contains(UPLOAD_MESSAGE));
        assert_eq!(
            f.host.pending_timers(),
            vec![&TimerTask::FinishImageUpload("ceviche-tropical".to_string())]
        );

        uploads.finish("ceviche-tropical", &mut f.toasts, &mut f.host);
        assert_eq!(uploads.in_flight(), 0);
        assert!(f.host.removed().contains(&LOADING_OVERLAY.to_string()));
        assert_eq!(titles(&f.toasts), vec!["Image Uploaded!"]);
    }

    #[test]
    fn overlay_stays_until_last_upload_finishes() {
        let mut f = fixture();
        let mut uploads = ImageUploads::new();
        uploads.start(&f.catalog, "ceviche-tropical", &mut f.host);
        uploads.start(&f.catalog, "pargo-rojo-grillado", &mut f.host);
        let overlay_id = format!(r#"id="{LOADING_OVERLAY}""#);
        assert_eq!(f.host.content(OVERLAY_ROOT).unwrap().matches(&overlay_id).count(), 1);

        uploads.finish("ceviche-tropical", &mut f.toasts, &mut f.host);
        assert!(f.host.removed().is_empty());
        uploads.finish("pargo-rojo-grillado", &mut f.toasts, &mut f.host);
        assert_eq!(f.host.removed(), [LOADING_OVERLAY.to_string()]);
    }

    #[test]
    fn upload_for_unknown_dish_or_stray_finish_does_nothing() {
        let mut f = fixture();
        let mut uploads = ImageUploads::new();
        assert!(!uploads.start(&f.catalog, "nope", &mut f.host));
        assert!(f.host.pending_timers().is_empty());
        uploads.finish("nope", &mut f.toasts, &mut f.host);
        assert!(f.toasts.queue().is_empty());
        assert!(f.host.removed().is_empty());
    }
}
