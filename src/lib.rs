pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod journal;
pub mod models;
pub mod store;
pub mod tui;
pub mod views;

pub use error::{Error, Result};
pub use journal::Journal;
