//! Interactive prompt: one [`Command`] per line, driving an [`App`].

use std::io::{self, Write};
use std::path::PathBuf;

use colored::*;
use tokio::io::AsyncBufReadExt;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::warn;

use crate::api::HotelApi;
use crate::app::App;
use crate::auth::AuthForm;
use crate::cli::{Command, Line};
use crate::context::AuthMode;
use crate::view::{self, format_price, ProfileForm, Speaker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl<A: HotelApi, W: Write> {
    pub app: App<A>,
    out: W,
    html_out: Option<PathBuf>,
    /// Booking id waiting for a yes/no answer.
    pending_cancel: Option<i64>,
    last_toast: u64,
}

impl<A: HotelApi, W: Write> Repl<A, W> {
    pub fn new(app: App<A>, out: W, html_out: Option<PathBuf>) -> Self {
        Self {
            app,
            out,
            html_out,
            pending_cancel: None,
            last_toast: 0,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Load the page, then read commands from stdin until `quit` or EOF.
    pub async fn run(&mut self) -> io::Result<()> {
        self.app.start().await;
        self.after_command()?;
        writeln!(self.out, "{}", "Type `help` for commands.".bright_blue())?;

        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = LinesStream::new(stdin.lines());
        self.prompt()?;
        while let Some(line) = lines.next().await {
            let line = line?;
            if self.handle(&line).await? == Flow::Quit {
                break;
            }
            self.prompt()?;
        }
        Ok(())
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{}", "restavo> ".bright_cyan())?;
        self.out.flush()
    }

    /// Handle one input line.
    pub async fn handle(&mut self, line: &str) -> io::Result<Flow> {
        if let Some(id) = self.pending_cancel.take() {
            if matches!(line.trim(), "y" | "Y" | "yes") {
                self.app.delete_booking(id).await;
                self.print_bookings()?;
            } else {
                writeln!(self.out, "Kept booking #{id}.")?;
            }
            self.after_command()?;
            return Ok(Flow::Continue);
        }

        let command = match Line::parse_line(line) {
            Ok(Some(c)) => c,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                writeln!(self.out, "{e}")?;
                return Ok(Flow::Continue);
            }
        };

        let flow = self.dispatch(&command).await?;
        self.after_command()?;
        Ok(flow)
    }

    async fn dispatch(&mut self, command: &Command) -> io::Result<Flow> {
        match command {
            Command::Search { city, check_in, check_out } => {
                if (check_in.is_some() || check_out.is_some())
                    && !self.app.set_stay_dates(*check_in, *check_out)
                {
                    return Ok(Flow::Continue);
                }
                let city = if city.is_empty() {
                    self.app.page.search_form.city.clone()
                } else {
                    city.join(" ")
                };
                self.app.search(&city).await;
                self.print_hotels()?;
            }
            Command::Login { username, password } => {
                self.app.set_auth_mode(AuthMode::Login);
                self.submit(username, password, "").await?;
            }
            Command::Register { username, password, age } => {
                self.app.set_auth_mode(AuthMode::Register);
                self.submit(username, password, age).await?;
            }
            Command::Logout => self.app.logout().await,
            Command::Status => {
                self.app.check_status().await;
                match self.app.ctx.session() {
                    Some(u) => writeln!(self.out, "Signed in as {}", u.username.bold())?,
                    None => writeln!(self.out, "Not signed in.")?,
                }
            }
            Command::Profile { email, full_name, phone, password } => {
                if !self.app.page.sidebar.open {
                    self.app.toggle_sidebar();
                }
                if email.is_some() || full_name.is_some() || phone.is_some() || password.is_some() {
                    let current = self.app.page.sidebar.form.clone();
                    let form = ProfileForm {
                        email: email.clone().unwrap_or(current.email),
                        full_name: full_name.clone().unwrap_or(current.full_name),
                        phone: phone.clone().unwrap_or(current.phone),
                        password: password.clone().unwrap_or_default(),
                    };
                    self.app.save_profile(form).await;
                }
                let form = &self.app.page.sidebar.form;
                writeln!(self.out, "email:     {}", form.email)?;
                writeln!(self.out, "full name: {}", form.full_name)?;
                writeln!(self.out, "phone:     {}", form.phone)?;
            }
            Command::Book { index } => match self.app.intent_for(*index) {
                Some(intent) => {
                    self.app.book_hotel(intent);
                    self.print_confirmation()?;
                }
                None => writeln!(self.out, "No result #{index}. Run `search` first.")?,
            },
            Command::Confirm { name, phone } => {
                if self.app.ctx.draft().is_none() {
                    writeln!(self.out, "Nothing to confirm.")?;
                } else {
                    self.app
                        .confirm_booking(name.as_deref().unwrap_or(""), phone.as_deref().unwrap_or(""))
                        .await;
                }
            }
            Command::Discard => self.app.close_booking_confirm(),
            Command::Bookings => {
                self.app.load_bookings().await;
                self.print_bookings()?;
            }
            Command::Cancel { id } => {
                self.pending_cancel = Some(*id);
                write!(self.out, "Cancel booking #{id}? [y/N] ")?;
            }
            Command::Fav { index } => match self.app.page.hotels.get(*index).cloned() {
                Some(hotel) => {
                    self.app.toggle_favorite(&hotel.name, &hotel.city).await;
                    let marker = if self.app.ctx.favorites().contains(&hotel.name) { "♥" } else { "♡" };
                    writeln!(self.out, "{} {}", marker.red(), hotel.name)?;
                }
                None => writeln!(self.out, "No result #{index}. Run `search` first.")?,
            },
            Command::Favorites => {
                self.app.open_favorites().await;
                if self.app.page.favorite_items.is_empty() {
                    writeln!(self.out, "No favorites.")?;
                }
                for fav in &self.app.page.favorite_items {
                    writeln!(self.out, "{} {} ({})", "♥".red(), fav.item_name, fav.city)?;
                }
            }
            Command::Chat { text } => {
                self.app.page.chat_open = true;
                let before = self.app.page.chat.len();
                self.app.send_chat(&text.join(" ")).await;
                for bubble in self.app.page.chat.iter().skip(before) {
                    if bubble.speaker == Speaker::Assistant {
                        writeln!(self.out, "{} {}", "assistant:".bright_magenta(), bubble.text)?;
                    }
                }
            }
            Command::Analyze { id } => {
                self.app.analyze_booking(*id).await;
                match &self.app.page.last_analysis {
                    Some(a) => {
                        writeln!(self.out, "{}", a.title.bold())?;
                        writeln!(self.out, "Price: {}", a.price_analysis)?;
                        for act in &a.activity_suggestions {
                            writeln!(self.out, "  - {}: {}", act.name, act.reason)?;
                        }
                        writeln!(self.out, "Summary: {}", a.summary)?;
                    }
                    None => writeln!(
                        self.out,
                        "{}",
                        "Analysis failed. Make sure you are signed in.".red()
                    )?,
                }
                self.app.close_analysis();
            }
            Command::Page => writeln!(self.out, "{}", self.app.render())?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn submit(&mut self, username: &str, password: &str, age: &str) -> io::Result<()> {
        self.app.open_auth_modal();
        self.app
            .submit_auth(AuthForm {
                username: username.to_string(),
                password: password.to_string(),
                age: age.to_string(),
            })
            .await;
        if let Some(err) = &self.app.page.auth.error {
            writeln!(self.out, "{}", err.red())?;
        }
        self.print_confirmation()
    }

    fn print_hotels(&mut self) -> io::Result<()> {
        if self.app.page.hotel_list == view::SEARCH_FAILED {
            writeln!(self.out, "{}", "Something went wrong while searching.".red())?;
            return Ok(());
        }
        let hotels = &self.app.page.hotels;
        if hotels.is_empty() {
            writeln!(self.out, "No hotels found in {}.", self.app.page.search_form.city)?;
            return Ok(());
        }
        let form = &self.app.page.search_form;
        writeln!(self.out, "{} → {}", form.check_in, form.check_out)?;
        for (i, h) in hotels.iter().enumerate() {
            let fav = if self.app.ctx.favorites().contains(&h.name) { "♥".red() } else { " ".normal() };
            writeln!(
                self.out,
                "[{i}] {fav} {} ({}) {} / night  ★ {}",
                h.name.bold(),
                h.city,
                format_price(h.price).green(),
                h.rating
            )?;
        }
        Ok(())
    }

    fn print_bookings(&mut self) -> io::Result<()> {
        if !self.app.page.bookings.open {
            return Ok(());
        }
        if self.app.page.booking_items.is_empty() {
            let msg = if self.app.ctx.is_signed_in() { "No bookings yet." } else { "Sign in first." };
            writeln!(self.out, "{msg}")?;
            return Ok(());
        }
        for b in &self.app.page.booking_items {
            writeln!(
                self.out,
                "#{} {} ({}) {} → {} {}",
                b.id,
                b.hotel_name.bold(),
                b.city,
                b.check_in,
                b.check_out,
                format_price(b.price).green()
            )?;
        }
        Ok(())
    }

    fn print_confirmation(&mut self) -> io::Result<()> {
        let Some(draft) = self.app.ctx.draft() else {
            return Ok(());
        };
        let i = &draft.intent;
        writeln!(
            self.out,
            "Confirm {} in {}, {} → {}, {} / night",
            i.hotel_name.bold(),
            i.city,
            i.check_in,
            i.check_out,
            format_price(i.price)
        )?;
        let mut hint = String::from("confirm");
        if draft.name_required {
            hint.push_str(" --name <booking name>");
        }
        if draft.phone_required {
            hint.push_str(" --phone <phone>");
        }
        writeln!(self.out, "Run `{hint}` or `discard`.")
    }

    /// Print any new toast and refresh the HTML snapshot.
    fn after_command(&mut self) -> io::Result<()> {
        if let Some(toast) = self.app.notifier.current() {
            if toast.seq != self.last_toast {
                self.last_toast = toast.seq;
                let text = if toast.is_error() {
                    toast.message.red()
                } else {
                    toast.message.green()
                };
                writeln!(self.out, "{text}")?;
            }
        }
        if let Some(path) = &self.html_out {
            if let Err(e) = std::fs::write(path, self.app.render()) {
                warn!(path = %path.display(), error = %e, "could not write page snapshot");
            }
        }
        Ok(())
    }
}
