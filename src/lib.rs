//! Client for the Restavo hotel booking site.
//!
//! [`App`] owns the client state ([`context::AppContext`]), the rendered
//! [`page::Page`] and a [`api::HotelApi`] implementation. Handlers for each
//! page component live in their own module as `impl App` blocks; the
//! `restavo` binary drives them from an interactive prompt.

pub mod api;
pub mod app;
pub mod auth;
pub mod booking;
pub mod chat;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod favorites;
pub mod http;
pub mod notifier;
pub mod page;
pub mod repl;
pub mod search;
pub mod view;

pub use api::HotelApi;
pub use app::App;
pub use config::Config;
pub use error::ClientError;
pub use http::HttpApi;
