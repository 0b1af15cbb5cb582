//! The two-step booking flow and the bookings list.

use tracing::{debug, info, warn};

use crate::api::{BookingIntent, BookingRequest, HotelApi};
use crate::app::App;
use crate::context::BookingDraft;
use crate::error::ClientError;
use crate::page::Panel;
use crate::view;

impl<A: HotelApi> App<A> {
    /// Booking intent for the `index`-th result card.
    pub fn intent_for(&self, index: usize) -> Option<BookingIntent> {
        let hotel = self.page.hotels.get(index)?;
        let form = &self.page.search_form;
        Some(BookingIntent {
            hotel_name: hotel.name.clone(),
            city: hotel.city.clone(),
            check_in: form.check_in,
            check_out: form.check_out,
            price: hotel.price,
        })
    }

    /// First step: capture the intent. Signed out, it is parked until login;
    /// signed in, the confirmation modal opens.
    pub fn book_hotel(&mut self, intent: BookingIntent) {
        if !self.ctx.is_signed_in() {
            debug!(hotel = %intent.hotel_name, "booking deferred until sign-in");
            self.ctx.defer_booking(intent);
            self.open_auth_modal();
            self.notifier.success("Please sign in to complete your booking");
            return;
        }
        self.open_booking_confirm(intent);
    }

    fn open_booking_confirm(&mut self, intent: BookingIntent) {
        let draft = BookingDraft::new(intent, self.ctx.session());
        self.page.confirm = Panel {
            open: true,
            html: view::booking_confirm_modal(&draft),
        };
        self.ctx.open_draft(draft);
    }

    /// Replay the booking parked while signed out. Runs at most once per
    /// deferral: the intent is taken out of the context before anything else.
    pub(crate) async fn replay_pending_booking(&mut self) {
        let Some(intent) = self.ctx.take_pending_booking() else {
            return;
        };
        info!(hotel = %intent.hotel_name, "replaying deferred booking");
        self.open_booking_confirm(intent);
        if self.ctx.draft().is_some_and(BookingDraft::is_complete) {
            self.confirm_booking("", "").await;
        }
    }

    /// Second step: submit the open draft. `name` and `phone` are only read
    /// when the draft asks for them.
    pub async fn confirm_booking(&mut self, name: &str, phone: &str) {
        let Some(draft) = self.ctx.draft() else {
            return;
        };

        let booking_name = if draft.name_required {
            name.trim().to_string()
        } else {
            draft.booking_name.clone()
        };
        if booking_name.is_empty() {
            self.notifier.error("Please enter the booking name");
            return;
        }
        let booking_phone = if draft.phone_required {
            phone.trim().to_string()
        } else {
            draft.booking_phone.clone()
        };
        if booking_phone.is_empty() {
            self.notifier.error("Please enter a phone number");
            return;
        }

        let Some(draft) = self.ctx.take_draft() else {
            return;
        };
        self.page.confirm = Panel::default();

        let hotel = draft.intent.hotel_name.clone();
        let request = BookingRequest {
            intent: draft.intent,
            booking_name,
            booking_phone,
        };
        match self.api.create_booking(&request).await {
            Ok(created) => {
                info!(%hotel, id = ?created.id, "booking created");
                self.notifier.success(format!("Booked {hotel} successfully!"));
            }
            Err(ClientError::Rejected { status, message }) => {
                warn!(%hotel, status, %message, "booking rejected");
                self.notifier.error("Booking failed");
            }
            Err(e) => {
                warn!(%hotel, error = %e, "booking request failed");
                self.notifier.error("Connection error");
            }
        }
    }

    pub fn close_booking_confirm(&mut self) {
        self.ctx.take_draft();
        self.page.confirm = Panel::default();
    }

    /// Open the bookings panel and fetch the list.
    pub async fn load_bookings(&mut self) {
        self.page.bookings.open = true;
        self.page.bookings.html = view::BOOKINGS_LOADING.to_string();
        match self.api.bookings().await {
            Ok(bookings) => {
                self.page.bookings.html = view::booking_list(&bookings);
                self.page.booking_items = bookings;
            }
            Err(e) => {
                debug!(error = %e, "bookings unavailable");
                self.page.booking_items.clear();
                self.page.bookings.html = view::BOOKINGS_SIGNED_OUT.to_string();
            }
        }
    }

    /// Cancel a booking, then re-fetch the list.
    pub async fn delete_booking(&mut self, id: i64) {
        match self.api.delete_booking(id).await {
            Ok(_) => {
                info!(id, "booking cancelled");
                self.notifier.success("Booking cancelled");
                self.load_bookings().await;
            }
            Err(e) => {
                warn!(id, error = %e, "cancel failed");
                self.notifier.error(e.server_message());
            }
        }
    }

    pub fn close_bookings(&mut self) {
        self.page.bookings.open = false;
    }
}
