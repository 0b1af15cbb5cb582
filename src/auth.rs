//! Login, registration, session restore, logout and the profile sidebar.

use thiserror::Error;
use tracing::{debug, error, info};

use crate::api::{Credentials, HotelApi, ProfileUpdate};
use crate::app::App;
use crate::context::AuthMode;
use crate::view::{self, ProfileForm};

/// Minimum age accepted at registration.
pub const MINIMUM_AGE: i64 = 18;

/// Why a registration form was refused before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgeError {
    #[error("Please enter your age")]
    Missing,
    #[error("Age is not valid")]
    Invalid,
    #[error("You must be 18 or older to register.")]
    Underage,
}

/// Check the age field of the registration form.
pub fn validate_age(age: &str) -> Result<i64, AgeError> {
    let age = age.trim();
    if age.is_empty() {
        return Err(AgeError::Missing);
    }
    let years: i64 = age.parse().map_err(|_| AgeError::Invalid)?;
    if years < MINIMUM_AGE {
        return Err(AgeError::Underage);
    }
    Ok(years)
}

/// What the user typed into the auth modal.
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
    pub age: String,
}

impl<A: HotelApi> App<A> {
    pub fn open_auth_modal(&mut self) {
        self.page.auth.open = true;
    }

    pub fn close_auth_modal(&mut self) {
        self.page.auth.open = false;
    }

    pub fn set_auth_mode(&mut self, mode: AuthMode) {
        self.ctx.auth_mode = mode;
    }

    /// Submit the auth modal in its current mode.
    pub async fn submit_auth(&mut self, form: AuthForm) {
        let mode = self.ctx.auth_mode;
        if mode == AuthMode::Register {
            if let Err(e) = validate_age(&form.age) {
                debug!(reason = %e, "registration refused locally");
                self.page.auth.error = Some(e.to_string());
                return;
            }
        }

        self.page.auth.busy = true;
        self.page.auth.error = None;

        let credentials = Credentials {
            username: form.username,
            password: form.password,
            age: (mode == AuthMode::Register).then(|| form.age.trim().to_string()),
        };

        match mode {
            AuthMode::Login => match self.api.login(&credentials).await {
                Ok(resp) => {
                    info!(user = %resp.user.username, "signed in");
                    self.notifier
                        .success(format!("Welcome, {}", resp.user.greeting_name()));
                    self.ctx.favorites_mut().clear();
                    self.ctx.sign_in(resp.user);
                    self.page.auth.open = false;
                    self.refresh_header();
                    self.refresh_favorites().await;
                    self.replay_pending_booking().await;
                }
                Err(e) => self.page.auth.error = Some(e.server_message()),
            },
            AuthMode::Register => match self.api.register(&credentials).await {
                Ok(_) => {
                    info!(user = %credentials.username, "registered");
                    self.notifier.success("Registered! Please sign in.");
                    self.set_auth_mode(AuthMode::Login);
                }
                Err(e) => self.page.auth.error = Some(e.server_message()),
            },
        }

        self.page.auth.busy = false;
    }

    /// Ask the backend whether a session cookie is still valid.
    pub async fn check_status(&mut self) {
        match self.api.status().await {
            Ok(status) => {
                let authenticated = status.is_authenticated;
                match status.user.filter(|_| authenticated) {
                    Some(user) => {
                        debug!(user = %user.username, "session restored");
                        self.ctx.sign_in(user);
                        self.refresh_favorites().await;
                    }
                    None => {
                        self.ctx.sign_out();
                        self.clear_favorites_view();
                    }
                }
                self.refresh_header();
            }
            Err(e) => error!(error = %e, "status check failed"),
        }
    }

    pub async fn logout(&mut self) {
        // The local session goes away even if the backend is unreachable.
        if let Err(e) = self.api.logout().await {
            debug!(error = %e, "logout request failed");
        }
        self.ctx.sign_out();
        self.refresh_header();
        self.page.sidebar.open = false;
        self.notifier.success("Signed out");
        self.clear_favorites_view();
        self.page.booking_items.clear();
        self.page.bookings.html.clear();
    }

    /// Empty the favorites panel and badge and redraw the cards without hearts.
    fn clear_favorites_view(&mut self) {
        self.page.favorite_items.clear();
        self.page.favorites.html.clear();
        self.page.favorites_badge = view::favorites_badge(0);
        self.rerender_hotels();
    }

    /// Open or close the profile sidebar; opening fills it from the session.
    pub fn toggle_sidebar(&mut self) {
        if self.page.sidebar.open {
            self.page.sidebar.open = false;
            return;
        }
        self.page.sidebar.open = true;
        if let Some(user) = self.ctx.session() {
            self.page.sidebar.form = ProfileForm::from_user(user);
        }
    }

    pub async fn save_profile(&mut self, form: ProfileForm) {
        if !self.ctx.is_signed_in() {
            self.notifier.error("You need to sign in");
            return;
        }

        self.page.sidebar.saving = true;
        let update = ProfileUpdate {
            username: form.email.clone(),
            full_name: form.full_name.clone(),
            phone: form.phone.clone(),
            new_password: (!form.password.is_empty()).then(|| form.password.clone()),
        };

        match self.api.update_profile(&update).await {
            Ok(resp) => {
                self.notifier.success(resp.message);
                if let Some(user) = self.ctx.session_mut() {
                    user.username = form.email.clone();
                    user.full_name = Some(form.full_name.clone());
                    user.phone = Some(form.phone.clone());
                }
                self.page.sidebar.form = ProfileForm {
                    password: String::new(),
                    ..form
                };
                self.refresh_header();
            }
            Err(e) => self.notifier.error(e.server_message()),
        }
        self.page.sidebar.saving = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("18", Ok(18))]
    #[case("120", Ok(120))]
    #[case("17", Err(AgeError::Underage))]
    #[case("", Err(AgeError::Missing))]
    #[case("18.5", Err(AgeError::Invalid))]
    #[case("abc", Err(AgeError::Invalid))]
    fn age_table(#[case] input: &str, #[case] expected: Result<i64, AgeError>) {
        assert_eq!(validate_age(input), expected);
    }

    #[test]
    fn age_under_eighteen_is_refused() {
        assert_eq!(validate_age("17"), Err(AgeError::Underage));
        assert_eq!(validate_age("0"), Err(AgeError::Underage));
        assert_eq!(validate_age("-3"), Err(AgeError::Underage));
    }

    #[test]
    fn age_eighteen_and_over_is_accepted() {
        assert_eq!(validate_age("18"), Ok(18));
        assert_eq!(validate_age(" 42 "), Ok(42));
    }

    #[test]
    fn blank_age_is_missing() {
        assert_eq!(validate_age(""), Err(AgeError::Missing));
        assert_eq!(validate_age("   "), Err(AgeError::Missing));
    }

    #[test]
    fn non_numeric_age_is_invalid() {
        assert_eq!(validate_age("eighteen"), Err(AgeError::Invalid));
    }

    #[test]
    fn age_errors_read_as_messages() {
        assert_eq!(AgeError::Underage.to_string(), "You must be 18 or older to register.");
        assert_eq!(AgeError::Missing.to_string(), "Please enter your age");
    }
}
