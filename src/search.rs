//! City search and result cards.

use chrono::{Days, NaiveDate};
use tracing::{debug, warn};

use crate::api::HotelApi;
use crate::app::App;
use crate::view;

impl<A: HotelApi> App<A> {
    /// Search `city` and render one card per hotel, using the form's dates.
    pub async fn search(&mut self, city: &str) {
        let city = city.trim();
        self.page.search_form.city = city.to_string();
        self.page.hotel_list = view::SEARCH_LOADING.to_string();

        match self.api.search(city).await {
            Ok(hotels) => {
                debug!(%city, results = hotels.len(), "search finished");
                self.page.hotel_list = view::hotel_list(
                    &hotels,
                    self.ctx.favorites(),
                    &self.page.search_form.dates(),
                );
                self.page.hotels = hotels;
            }
            Err(e) => {
                warn!(%city, error = %e, "search failed");
                self.page.hotels.clear();
                self.page.hotel_list = view::SEARCH_FAILED.to_string();
            }
        }
    }

    /// Update the form dates. A blank check-in means today and a blank
    /// check-out means the night after check-in.
    ///
    /// Returns `false`, leaving the form unchanged, when check-out is not
    /// after check-in.
    pub fn set_stay_dates(&mut self, check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> bool {
        let check_in = check_in.unwrap_or(self.today);
        let check_out = match check_out {
            Some(d) => d,
            None => check_in.checked_add_days(Days::new(1)).unwrap_or(check_in),
        };
        if check_out <= check_in {
            self.notifier.error("Check-out must be after check-in");
            return false;
        }
        self.page.search_form.check_in = check_in;
        self.page.search_form.check_out = check_out;
        true
    }
}
