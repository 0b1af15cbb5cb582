//! Typed view rendering, one function per page component.
//!
//! Every function returns an HTML fragment. Text coming from the backend or
//! the user always goes through [`escape`]. Actions are expressed as
//! `data-action` attributes for whatever front-end hosts the markup.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::api::{Analysis, Booking, Favorite, Hotel, User};
use crate::context::{AuthMode, BookingDraft, FavoritesSet};
use crate::notifier::Toast;

// ---------------------------------------------------------------------------
// Fixed messages
// ---------------------------------------------------------------------------

pub const SEARCH_LOADING: &str = r#"<p class="text-center p-10">Searching for hotels...</p>"#;
pub const SEARCH_EMPTY: &str =
    r#"<p class="text-center text-gray-500 py-10">No hotels are available in this city right now.</p>"#;
pub const SEARCH_FAILED: &str =
    r#"<p class="text-center text-red-500">Something went wrong while searching.</p>"#;

pub const BOOKINGS_LOADING: &str = r#"<p class="text-center p-4">Loading...</p>"#;
pub const BOOKINGS_EMPTY: &str = r#"<p class="text-center p-4 text-gray-500">No bookings yet.</p>"#;
pub const BOOKINGS_SIGNED_OUT: &str = r#"<p class="text-center text-red-500">Sign in first</p>"#;

pub const ANALYSIS_LOADING: &str = r#"<div class="text-center p-10"><p>Analyzing...</p></div>"#;
pub const ANALYSIS_FAILED: &str =
    r#"<p class="text-red-500 text-center">Analysis failed. Make sure you are signed in.</p>"#;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `250.0` → `$250`, `99.5` → `$99.50`.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${:.0}", price)
    } else {
        format!("${:.2}", price)
    }
}

/// The backend stores image paths relative to the project root
/// (`./static/image/Hotel1.jpg`); the site serves them from `/image/...`.
pub fn public_image_path(image_url: Option<&str>) -> String {
    match image_url {
        Some(url) => url.replacen("./static", "", 1),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// Check-in / check-out pair carried by every "Book now" action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDates {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

pub fn hotel_card(index: usize, hotel: &Hotel, is_favorite: bool, dates: &StayDates) -> String {
    let fav_class = if is_favorite {
        "text-red-500 fill-current"
    } else {
        "text-gray-400"
    };
    let name = escape(&hotel.name);
    let city = escape(&hotel.city);
    format!(
        r#"<div class="hotel-card bg-white rounded-xl shadow-lg mb-4 flex flex-col md:flex-row overflow-hidden" data-index="{index}">
  <div class="w-full md:w-56 bg-gray-200 h-56 md:h-auto relative">
    <img src="{img}" class="w-full h-full object-cover">
    <div class="absolute top-2 right-2 bg-white/90 px-2 py-1 rounded text-xs font-bold">&#11088; {rating}</div>
  </div>
  <div class="p-6 flex-grow flex flex-col justify-between">
    <div class="flex justify-between items-start">
      <div>
        <h3 class="text-xl font-bold text-gray-900">{name}</h3>
        <p class="text-gray-500">{city}</p>
      </div>
      <button data-action="toggle-favorite" data-hotel="{name}" data-city="{city}" class="{fav_class} p-2 rounded-full">&#9829;</button>
    </div>
    <div class="flex justify-between items-end mt-4">
      <div><span class="text-3xl font-bold text-green-700">{price}</span><span class="text-sm text-gray-400"> / night</span></div>
      <button data-action="book" data-hotel="{name}" data-city="{city}" data-check-in="{check_in}" data-check-out="{check_out}" data-price="{raw_price}" class="bg-brand-color text-white px-6 py-2 rounded-lg font-bold">Book now</button>
    </div>
  </div>
</div>"#,
        img = escape(&public_image_path(hotel.image_url.as_deref())),
        rating = hotel.rating,
        price = format_price(hotel.price),
        raw_price = hotel.price,
        check_in = dates.check_in,
        check_out = dates.check_out,
    )
}

pub fn hotel_list(hotels: &[Hotel], favorites: &FavoritesSet, dates: &StayDates) -> String {
    if hotels.is_empty() {
        return SEARCH_EMPTY.to_string();
    }
    hotels
        .iter()
        .enumerate()
        .map(|(i, h)| hotel_card(i, h, favorites.contains(&h.name), dates))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Bookings and favorites
// ---------------------------------------------------------------------------

pub fn booking_row(booking: &Booking) -> String {
    format!(
        r#"<div class="bg-white p-4 rounded-lg shadow border mb-3 flex flex-col md:flex-row gap-4 items-center" data-booking="{id}">
  <div class="flex-grow">
    <h4 class="font-bold text-lg">{hotel}</h4>
    <p class="text-gray-600 text-sm">{city}</p>
    <p class="text-xs text-gray-400">{check_in} to {check_out}</p>
  </div>
  <div class="text-green-600 font-bold text-xl">{price}</div>
  <div class="flex gap-2">
    <button data-action="analyze" data-booking="{id}" class="bg-blue-100 text-blue-600 px-3 py-1 rounded text-sm">AI analysis</button>
    <button data-action="cancel-booking" data-booking="{id}" class="bg-red-100 text-red-600 px-3 py-1 rounded text-sm">Cancel</button>
  </div>
</div>"#,
        id = booking.id,
        hotel = escape(&booking.hotel_name),
        city = escape(&booking.city),
        check_in = escape(&booking.check_in),
        check_out = escape(&booking.check_out),
        price = format_price(booking.price),
    )
}

pub fn booking_list(bookings: &[Booking]) -> String {
    if bookings.is_empty() {
        return BOOKINGS_EMPTY.to_string();
    }
    bookings.iter().map(booking_row).collect::<Vec<_>>().join("\n")
}

pub fn favorites_list(favorites: &[Favorite]) -> String {
    let mut out = String::new();
    for fav in favorites {
        let name = escape(&fav.item_name);
        let city = escape(&fav.city);
        let _ = writeln!(
            out,
            r#"<div class="flex justify-between items-center bg-gray-50 p-3 rounded mb-2"><div><p class="font-bold text-gray-800">{name}</p><p class="text-xs text-gray-500">{city}</p></div><button data-action="toggle-favorite" data-hotel="{name}" data-city="{city}" class="text-red-500">Remove</button></div>"#
        );
    }
    out
}

/// Badge next to the favorites button; hidden when there is nothing to count.
pub fn favorites_badge(count: usize) -> String {
    let hidden = if count == 0 { " opacity-0" } else { "" };
    format!(r#"<span id="favorites-count" class="badge{hidden}">{count}</span>"#)
}

// ---------------------------------------------------------------------------
// Header, auth, profile
// ---------------------------------------------------------------------------

pub fn header(user: Option<&User>) -> String {
    match user {
        Some(u) => format!(
            r#"<button id="user-profile-btn" data-action="toggle-sidebar"><span id="user-name-display">{}</span></button>"#,
            escape(u.display_name())
        ),
        None => r#"<button id="auth-action-btn" data-action="open-auth"><span>Sign in</span></button>"#
            .to_string(),
    }
}

pub fn auth_modal(mode: AuthMode, error: Option<&str>, busy: bool) -> String {
    let (login_tab, register_tab) = match mode {
        AuthMode::Login => (" border-brand-color", ""),
        AuthMode::Register => ("", " border-brand-color"),
    };
    let age = if mode.shows_age() {
        r#"<div id="age-container"><input id="age" type="number" required></div>"#
    } else {
        r#"<div id="age-container" class="hidden"><input id="age" type="number"></div>"#
    };
    let error_html = match error {
        Some(msg) => format!(r#"<p id="auth-error-message" class="text-red-600">{}</p>"#, escape(msg)),
        None => r#"<p id="auth-error-message" class="hidden"></p>"#.to_string(),
    };
    let (label, disabled) = if busy {
        ("Processing...", " disabled")
    } else {
        (mode.submit_label(), "")
    };
    format!(
        r#"<div id="auth-modal" class="fixed">
  <button id="login-tab" data-action="auth-mode-login" class="tab{login_tab}">Sign in</button>
  <button id="register-tab" data-action="auth-mode-register" class="tab{register_tab}">Register</button>
  <form id="auth-form"><input id="email" type="email"><input id="password" type="password">{age}{error_html}<button id="auth-submit-btn"{disabled}>{label}</button></form>
</div>"#
    )
}

/// Values shown in the profile sidebar form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub password: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            email: user.username.clone(),
            full_name: user.full_name.clone().unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
            password: String::new(),
        }
    }
}

pub fn profile_sidebar(form: &ProfileForm, saving: bool) -> String {
    let (label, disabled) = if saving {
        ("Saving...", " disabled")
    } else {
        ("Save", "")
    };
    format!(
        r#"<aside id="profile-sidebar">
  <input id="profile-email" value="{email}">
  <input id="profile-fullname" value="{full_name}">
  <input id="profile-phone" value="{phone}">
  <input id="profile-password" type="password" value="">
  <button id="save-profile-btn"{disabled}>{label}</button>
  <button id="sidebar-logout-btn" data-action="logout">Sign out</button>
</aside>"#,
        email = escape(&form.email),
        full_name = escape(&form.full_name),
        phone = escape(&form.phone),
    )
}

// ---------------------------------------------------------------------------
// Booking confirmation
// ---------------------------------------------------------------------------

pub fn booking_confirm_modal(draft: &BookingDraft) -> String {
    let name_group = if draft.name_required {
        r#"<div id="name-input-group"><input id="confirm-name-input" required value=""></div>"#.to_string()
    } else {
        format!(
            r#"<div id="name-input-group" class="hidden"><input id="confirm-name-input" value="{}"></div>"#,
            escape(&draft.booking_name)
        )
    };
    let phone_group = if draft.phone_required {
        r#"<div id="phone-input-group"><input id="confirm-phone-input" required value=""></div>"#.to_string()
    } else {
        format!(
            r#"<div id="phone-input-group" class="hidden"><input id="confirm-phone-input" value="{}"></div>"#,
            escape(&draft.booking_phone)
        )
    };
    let i = &draft.intent;
    format!(
        r#"<div id="booking-confirm-modal" class="fixed">
  <p id="confirm-hotel-name">{hotel}</p>
  <p id="confirm-city">{city}</p>
  <p id="confirm-check-in">{check_in}</p>
  <p id="confirm-check-out">{check_out}</p>
  <p id="confirm-price">{price}</p>
  {name_group}
  {phone_group}
  <button id="confirm-booking-btn" data-action="confirm-booking">Confirm booking</button>
</div>"#,
        hotel = escape(&i.hotel_name),
        city = escape(&i.city),
        check_in = i.check_in,
        check_out = i.check_out,
        price = format_price(i.price),
    )
}

// ---------------------------------------------------------------------------
// Chat and analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBubble {
    pub speaker: Speaker,
    pub text: String,
}

pub fn chat_bubble(bubble: &ChatBubble) -> String {
    let text = escape(&bubble.text);
    match bubble.speaker {
        Speaker::User => format!(
            r#"<div class="flex justify-end mb-2"><div class="bg-blue-500 text-white p-2 rounded-lg max-w-[80%]">{text}</div></div>"#
        ),
        Speaker::Assistant => format!(
            r#"<div class="flex justify-start mb-2"><div class="bg-gray-100 text-gray-800 p-2 rounded-lg max-w-[80%] border">{text}</div></div>"#
        ),
    }
}

pub fn analysis_panel(analysis: &Analysis) -> String {
    let activities: String = analysis
        .activity_suggestions
        .iter()
        .map(|a| format!("<li><b>{}:</b> {}</li>", escape(&a.name), escape(&a.reason)))
        .collect();
    format!(
        r#"<h3 class="text-xl font-bold text-brand-color mb-3">{title}</h3>
<div class="mb-4 bg-blue-50 p-3 rounded"><p class="font-bold">Price:</p><p>{price}</p></div>
<div class="mb-4"><p class="font-bold mb-2">Activities:</p><ul class="list-disc pr-5 text-sm space-y-1">{activities}</ul></div>
<div class="bg-green-50 p-3 rounded text-sm text-green-800 border border-green-200"><b>Summary:</b> {summary}</div>"#,
        title = escape(&analysis.title),
        price = escape(&analysis.price_analysis),
        summary = escape(&analysis.summary),
    )
}

pub fn toast(toast: &Toast) -> String {
    let color = if toast.is_error() { "bg-red-600" } else { "bg-green-600" };
    format!(
        r#"<div id="toast-message" class="fixed top-5 {color} text-white px-6 py-3 rounded-lg shadow-xl">{}</div>"#,
        escape(&toast.message)
    )
}
