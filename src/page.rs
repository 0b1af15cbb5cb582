//! The rendered page: every region a handler can update.
//!
//! Regions hold the HTML their view function last produced, next to the small
//! amount of typed UI state (open/closed, busy, inline errors) the handlers
//! need to read back.

use chrono::{Days, NaiveDate};

use crate::api::{Analysis, Booking, Favorite, Hotel};
use crate::context::AppContext;
use crate::notifier::Notifier;
use crate::view::{self, ChatBubble, ProfileForm, StayDates};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub city: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl SearchForm {
    /// Form defaults: check-in `today`, check-out `nights` later.
    pub fn starting(today: NaiveDate, city: impl Into<String>, nights: u32) -> Self {
        Self {
            city: city.into(),
            check_in: today,
            check_out: today
                .checked_add_days(Days::new(u64::from(nights)))
                .unwrap_or(today),
        }
    }

    pub fn dates(&self) -> StayDates {
        StayDates {
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthModal {
    pub open: bool,
    pub error: Option<String>,
    pub busy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sidebar {
    pub open: bool,
    pub form: ProfileForm,
    pub saving: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    pub open: bool,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub header: String,
    pub search_form: SearchForm,
    /// Results of the last search, in card order.
    pub hotels: Vec<Hotel>,
    pub hotel_list: String,
    /// Favorites as last fetched, in server order.
    pub favorite_items: Vec<Favorite>,
    pub favorites: Panel,
    pub favorites_badge: String,
    /// Bookings as last fetched, newest first.
    pub booking_items: Vec<Booking>,
    pub bookings: Panel,
    pub chat_open: bool,
    pub chat: Vec<ChatBubble>,
    pub analysis: Panel,
    pub last_analysis: Option<Analysis>,
    pub auth: AuthModal,
    pub confirm: Panel,
    pub sidebar: Sidebar,
}

impl Page {
    pub fn new(search_form: SearchForm) -> Self {
        Self {
            header: view::header(None),
            search_form,
            hotels: Vec::new(),
            hotel_list: String::new(),
            favorite_items: Vec::new(),
            favorites: Panel::default(),
            favorites_badge: view::favorites_badge(0),
            booking_items: Vec::new(),
            bookings: Panel::default(),
            chat_open: false,
            chat: Vec::new(),
            analysis: Panel::default(),
            last_analysis: None,
            auth: AuthModal::default(),
            confirm: Panel::default(),
            sidebar: Sidebar::default(),
        }
    }

    /// Render the whole page as one HTML document.
    pub fn render(&self, ctx: &AppContext, notifier: &Notifier) -> String {
        let mut body = Vec::new();
        body.push(format!(
            r#"<header>{}<button id="favorites-toggle" data-action="open-favorites">Favorites {}</button></header>"#,
            self.header, self.favorites_badge
        ));
        if let Some(toast) = notifier.current() {
            body.push(view::toast(toast));
        }
        body.push(format!(
            r#"<form id="search-form"><input id="city" value="{}"><input id="check_in" value="{}"><input id="check_out" value="{}"></form>"#,
            view::escape(&self.search_form.city),
            self.search_form.check_in,
            self.search_form.check_out,
        ));
        body.push(format!(r#"<section id="hotel-cards-list">{}</section>"#, self.hotel_list));
        body.push(format!(
            r#"<section id="favorites-modal"{}><div id="favorites-list">{}</div></section>"#,
            hidden_attr(self.favorites.open),
            self.favorites.html
        ));
        body.push(format!(
            r#"<section id="bookings-modal"{}><div id="bookings-list">{}</div></section>"#,
            hidden_attr(self.bookings.open),
            self.bookings.html
        ));
        if self.auth.open {
            body.push(view::auth_modal(ctx.auth_mode, self.auth.error.as_deref(), self.auth.busy));
        }
        if self.confirm.open {
            body.push(self.confirm.html.clone());
        }
        if self.sidebar.open {
            body.push(view::profile_sidebar(&self.sidebar.form, self.sidebar.saving));
        }
        let chat: String = self.chat.iter().map(view::chat_bubble).collect();
        body.push(format!(
            r#"<section id="chat-window"{}><div id="chat-messages">{}</div></section>"#,
            hidden_attr(self.chat_open),
            chat
        ));
        body.push(format!(
            r#"<section id="ai-analysis-modal"{}><div id="ai-analysis-content">{}</div></section>"#,
            hidden_attr(self.analysis.open),
            self.analysis.html
        ));

        format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Restavo</title></head>\n<body data-auth-mode=\"{}\">\n{}\n</body>\n</html>\n",
            ctx.auth_mode,
            body.join("\n")
        )
    }
}

fn hidden_attr(open: bool) -> &'static str {
    if open {
        ""
    } else {
        r#" class="hidden""#
    }
}
