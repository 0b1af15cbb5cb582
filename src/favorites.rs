//! Favorites toggling and the favorites panel.

use tracing::{debug, warn};

use crate::api::{FavoriteToggle, HotelApi};
use crate::app::App;
use crate::view;

impl<A: HotelApi> App<A> {
    /// Flip `name` in the user's favorites, then re-fetch the whole list.
    pub async fn toggle_favorite(&mut self, name: &str, city: &str) {
        if !self.ctx.is_signed_in() {
            self.notifier.success("You need to sign in");
            self.open_auth_modal();
            return;
        }

        let toggle = FavoriteToggle {
            item_name: name.to_string(),
            city: city.to_string(),
        };
        match self.api.toggle_favorite(&toggle).await {
            Ok(resp) if resp.success => {
                if let Some(present) = resp.is_favorite {
                    debug!(hotel = %name, present, "favorite toggled");
                    self.ctx.favorites_mut().set(name, present);
                    self.rerender_hotels();
                }
                self.refresh_favorites().await;
            }
            Ok(_) => warn!(hotel = %name, "favorite toggle not applied"),
            Err(e) => {
                warn!(hotel = %name, error = %e, "favorite toggle failed");
                self.notifier.error("Could not update favorites");
            }
        }
    }

    /// Rebuild the favorites set from the backend and redraw everything that
    /// shows it. Does nothing while signed out.
    pub async fn refresh_favorites(&mut self) {
        if !self.ctx.is_signed_in() {
            return;
        }
        match self.api.favorites().await {
            Ok(list) => {
                self.ctx.favorites_mut().rebuild(&list);
                self.page.favorites.html = view::favorites_list(&list);
                self.page.favorites_badge = view::favorites_badge(list.len());
                self.page.favorite_items = list;
                self.rerender_hotels();
            }
            Err(e) => debug!(error = %e, "favorites unavailable"),
        }
    }

    pub async fn open_favorites(&mut self) {
        self.page.favorites.open = true;
        self.refresh_favorites().await;
    }

    pub fn close_favorites(&mut self) {
        self.page.favorites.open = false;
    }
}
