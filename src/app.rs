//! Page bootstrap and the [`App`] every handler hangs off.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::api::HotelApi;
use crate::config::UiConfig;
use crate::context::AppContext;
use crate::notifier::Notifier;
use crate::page::{Page, SearchForm};
use crate::view;

/// One open page: the API boundary, the client state and the rendered
/// regions.
///
/// Handlers live in the component modules ([`crate::auth`],
/// [`crate::search`], [`crate::booking`], [`crate::favorites`],
/// [`crate::chat`]) as `impl App` blocks. Each takes `&mut self`, so two
/// actions can never interleave on the same page.
pub struct App<A: HotelApi> {
    pub(crate) api: A,
    pub ctx: AppContext,
    pub page: Page,
    pub notifier: Notifier,
    pub(crate) ui: UiConfig,
    pub(crate) today: NaiveDate,
}

impl<A: HotelApi> App<A> {
    pub fn new(api: A, ui: UiConfig) -> Self {
        Self::with_today(api, ui, Local::now().date_naive())
    }

    /// Like [`App::new`] with a fixed "today", for reproducible dates.
    pub fn with_today(api: A, ui: UiConfig, today: NaiveDate) -> Self {
        let form = SearchForm::starting(today, ui.default_city.clone(), ui.default_stay_nights);
        Self {
            api,
            ctx: AppContext::new(),
            page: Page::new(form),
            notifier: Notifier::new(ui.toast_duration()),
            ui,
            today,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Page load: restore the session, then search the default city.
    pub async fn start(&mut self) {
        info!(city = %self.ui.default_city, "starting page");
        self.check_status().await;
        let city = self.ui.default_city.clone();
        self.search(&city).await;
    }

    /// The whole page as an HTML document.
    pub fn render(&self) -> String {
        self.page.render(&self.ctx, &self.notifier)
    }

    pub(crate) fn refresh_header(&mut self) {
        self.page.header = view::header(self.ctx.session());
    }

    /// Re-draw the current result cards, e.g. after favorites changed.
    pub(crate) fn rerender_hotels(&mut self) {
        if self.page.hotels.is_empty() {
            return;
        }
        self.page.hotel_list = view::hotel_list(
            &self.page.hotels,
            self.ctx.favorites(),
            &self.page.search_form.dates(),
        );
    }
}
