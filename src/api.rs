//! Wire types for the Restavo backend and the [`HotelApi`] seam.
//!
//! Field names mirror the backend's JSON exactly. Request types only carry
//! what the backend reads; response types tolerate missing optional fields.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

pub const STATUS: &str = "/api/status";
pub const LOGIN: &str = "/api/login";
pub const REGISTER: &str = "/api/register";
pub const LOGOUT: &str = "/api/logout";
pub const PROFILE_UPDATE: &str = "/api/profile/update";
pub const SEARCH: &str = "/api/search";
pub const BOOKING: &str = "/api/booking";
pub const BOOKINGS: &str = "/api/bookings";
pub const FAVORITES: &str = "/api/favorites";
pub const FAVORITES_TOGGLE: &str = "/api/favorites/toggle";
pub const CHAT: &str = "/api/gemini/chat";
pub const ANALYZE: &str = "/api/gemini/analyze";

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// The signed-in user as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl User {
    /// Name for greetings: the full name when set, the login email otherwise.
    pub fn greeting_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }

    /// Name for the header button: the full name, or the mailbox part of the
    /// email.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.username.split('@').next().unwrap_or(&self.username),
        }
    }

    pub fn has_full_name(&self) -> bool {
        self.full_name.as_deref().is_some_and(|n| !n.is_empty())
    }

    pub fn has_phone(&self) -> bool {
        self.phone.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub is_authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
}

/// Body for both `/api/login` and `/api/register`.
///
/// `age` is sent as typed by the user; the backend parses it.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
}

/// The `{ "message": ... }` envelope most endpoints reply with.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub full_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

// ---------------------------------------------------------------------------
// Hotels and bookings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub city: String,
    pub price: f64,
    pub rating: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// What the user asked to book, before any contact details are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingIntent {
    pub hotel_name: String,
    pub city: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingRequest {
    #[serde(flatten)]
    pub intent: BookingIntent,
    pub booking_name: String,
    pub booking_phone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingCreated {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub id: Option<i64>,
}

/// A stored booking. Dates stay as the backend stored them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub user_name: Option<String>,
    pub hotel_name: String,
    pub city: String,
    pub check_in: String,
    pub check_out: String,
    pub price: f64,
    #[serde(default)]
    pub hotel_image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub item_name: String,
    pub city: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteToggle {
    pub item_name: String,
    pub city: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleResponse {
    pub success: bool,
    /// `null` when the backend failed to apply the toggle.
    #[serde(default)]
    pub is_favorite: Option<bool>,
}

// ---------------------------------------------------------------------------
// Assistant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub booking_id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivitySuggestion {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Analysis {
    pub title: String,
    pub price_analysis: String,
    #[serde(default)]
    pub activity_suggestions: Vec<ActivitySuggestion>,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// HotelApi
// ---------------------------------------------------------------------------

/// Everything the client asks of the backend.
///
/// [`crate::http::HttpApi`] is the production implementation. Non-2xx
/// replies come back as [`ClientError::Rejected`] carrying the server's
/// `message`.
#[async_trait]
pub trait HotelApi: Send + Sync {
    async fn status(&self) -> Result<StatusResponse, ClientError>;

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError>;

    async fn register(&self, credentials: &Credentials) -> Result<MessageResponse, ClientError>;

    async fn logout(&self) -> Result<(), ClientError>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<MessageResponse, ClientError>;

    async fn search(&self, city: &str) -> Result<Vec<Hotel>, ClientError>;

    async fn create_booking(&self, request: &BookingRequest) -> Result<BookingCreated, ClientError>;

    async fn bookings(&self) -> Result<Vec<Booking>, ClientError>;

    async fn delete_booking(&self, id: i64) -> Result<MessageResponse, ClientError>;

    async fn favorites(&self) -> Result<Vec<Favorite>, ClientError>;

    async fn toggle_favorite(&self, toggle: &FavoriteToggle) -> Result<ToggleResponse, ClientError>;

    async fn chat(&self, prompt: &str) -> Result<ChatResponse, ClientError>;

    async fn analyze(&self, booking_id: i64) -> Result<Analysis, ClientError>;
}
