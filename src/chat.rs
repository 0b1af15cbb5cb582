//! Assistant chat and per-booking AI analysis.

use tracing::{debug, warn};

use crate::api::HotelApi;
use crate::app::App;
use crate::page::Panel;
use crate::view::{self, ChatBubble, Speaker};

impl<A: HotelApi> App<A> {
    pub fn toggle_chat(&mut self) {
        self.page.chat_open = !self.page.chat_open;
    }

    /// Append the user's message, ask the assistant, append its reply.
    pub async fn send_chat(&mut self, text: &str) {
        let prompt = text.trim();
        if prompt.is_empty() {
            return;
        }
        self.page.chat.push(ChatBubble {
            speaker: Speaker::User,
            text: prompt.to_string(),
        });

        match self.api.chat(prompt).await {
            Ok(reply) => self.page.chat.push(ChatBubble {
                speaker: Speaker::Assistant,
                text: reply.response,
            }),
            Err(e) => debug!(error = %e, "chat request failed"),
        }
    }

    pub async fn analyze_booking(&mut self, booking_id: i64) {
        self.page.analysis = Panel {
            open: true,
            html: view::ANALYSIS_LOADING.to_string(),
        };
        match self.api.analyze(booking_id).await {
            Ok(analysis) => {
                self.page.analysis.html = view::analysis_panel(&analysis);
                self.page.last_analysis = Some(analysis);
            }
            Err(e) => {
                warn!(booking_id, error = %e, "analysis failed");
                self.page.analysis.html = view::ANALYSIS_FAILED.to_string();
                self.page.last_analysis = None;
            }
        }
    }

    pub fn close_analysis(&mut self) {
        self.page.analysis.open = false;
    }
}
