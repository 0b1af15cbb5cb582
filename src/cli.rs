use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "restavo")]
#[command(version)]
#[command(about = "Search, book and manage Restavo hotel stays from the terminal")]
pub struct Args {
    /// Config file (defaults to ./restavo.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding config and RESTAVO_API_URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Write the rendered page to this file after every command
    #[arg(long)]
    pub html_out: Option<PathBuf>,

    /// Print a shell completion script and exit
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,
}

/// One line typed at the prompt.
#[derive(Parser, Debug)]
#[command(name = "restavo>", no_binary_name = true, disable_version_flag = true)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Search hotels in a city (the default city when omitted)
    Search {
        city: Vec<String>,
        /// Check-in date, YYYY-MM-DD
        #[arg(long)]
        check_in: Option<NaiveDate>,
        /// Check-out date, YYYY-MM-DD
        #[arg(long)]
        check_out: Option<NaiveDate>,
    },
    /// Sign in
    Login { username: String, password: String },
    /// Create an account
    Register {
        username: String,
        password: String,
        age: String,
    },
    /// Sign out
    Logout,
    /// Show who is signed in
    Status,
    /// Show the profile, or save it when any field is given
    Profile {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Start booking the hotel at this result index
    Book { index: usize },
    /// Confirm the open booking
    Confirm {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Close the booking confirmation without booking
    Discard,
    /// List your bookings
    Bookings,
    /// Cancel a booking (asks for confirmation)
    Cancel { id: i64 },
    /// Toggle the hotel at this result index in your favorites
    Fav { index: usize },
    /// List your favorites
    Favorites,
    /// Ask the assistant
    Chat {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// AI analysis of one of your bookings
    Analyze { id: i64 },
    /// Print the rendered page
    Page,
    /// Leave
    Quit,
}

impl Line {
    /// Parse one prompt line. Blank lines yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Command>, clap::Error> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }
        Line::try_parse_from(words).map(|l| Some(l.command))
    }
}
