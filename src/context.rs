//! Client-side state shared by every handler.
//!
//! One [`AppContext`] per page. It holds the session, the favorites set, the
//! single deferred booking and the ephemeral confirmation draft.

use std::collections::HashMap;

use crate::api::{BookingIntent, Favorite, User};

/// Which form the auth modal is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Sign in",
            AuthMode::Register => "Create account",
        }
    }

    pub fn shows_age(self) -> bool {
        self == AuthMode::Register
    }
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMode::Login => write!(f, "login"),
            AuthMode::Register => write!(f, "register"),
        }
    }
}

/// Hotel name → membership, as last reported by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesSet {
    entries: HashMap<String, bool>,
}

impl FavoritesSet {
    pub fn contains(&self, name: &str) -> bool {
        self.entries.get(name).copied().unwrap_or(false)
    }

    /// Record one toggle result ahead of the next full rebuild.
    pub fn set(&mut self, name: &str, present: bool) {
        self.entries.insert(name.to_string(), present);
    }

    /// Replace everything with the server's list.
    pub fn rebuild(&mut self, favorites: &[Favorite]) {
        self.entries = favorites
            .iter()
            .map(|f| (f.item_name.clone(), true))
            .collect();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of names currently marked present.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|v| **v).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Contents of the booking confirmation modal.
///
/// The name and phone fields are only collected when the session lacks them;
/// otherwise they are pre-filled and hidden.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub intent: BookingIntent,
    pub booking_name: String,
    pub booking_phone: String,
    pub name_required: bool,
    pub phone_required: bool,
}

impl BookingDraft {
    pub fn new(intent: BookingIntent, session: Option<&User>) -> Self {
        let name = session
            .filter(|u| u.has_full_name())
            .and_then(|u| u.full_name.clone());
        let phone = session.filter(|u| u.has_phone()).and_then(|u| u.phone.clone());
        Self {
            intent,
            name_required: name.is_none(),
            phone_required: phone.is_none(),
            booking_name: name.unwrap_or_default(),
            booking_phone: phone.unwrap_or_default(),
        }
    }

    /// Nothing left for the user to fill in.
    pub fn is_complete(&self) -> bool {
        !self.name_required && !self.phone_required
    }
}

#[derive(Debug, Default)]
pub struct AppContext {
    session: Option<User>,
    favorites: FavoritesSet,
    pending_booking: Option<BookingIntent>,
    draft: Option<BookingDraft>,
    pub auth_mode: AuthMode,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut User> {
        self.session.as_mut()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn sign_in(&mut self, user: User) {
        self.session = Some(user);
    }

    /// Drop the session and everything derived from it.
    pub fn sign_out(&mut self) {
        self.session = None;
        self.favorites.clear();
        self.draft = None;
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    pub fn favorites_mut(&mut self) -> &mut FavoritesSet {
        &mut self.favorites
    }

    /// Defer `intent` until login. Replaces any earlier deferred intent.
    pub fn defer_booking(&mut self, intent: BookingIntent) {
        self.pending_booking = Some(intent);
    }

    pub fn pending_booking(&self) -> Option<&BookingIntent> {
        self.pending_booking.as_ref()
    }

    /// Hand out the deferred intent. A second call returns `None`.
    pub fn take_pending_booking(&mut self) -> Option<BookingIntent> {
        self.pending_booking.take()
    }

    pub fn draft(&self) -> Option<&BookingDraft> {
        self.draft.as_ref()
    }

    pub fn open_draft(&mut self, draft: BookingDraft) {
        self.draft = Some(draft);
    }

    pub fn take_draft(&mut self) -> Option<BookingDraft> {
        self.draft.take()
    }
}
