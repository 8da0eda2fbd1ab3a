//! dailymuse - One comic a day
//!
//! Schedules daily comic entries (a title card plus a four-panel comic)
//! on unique dates, keeps their images in an asset store, and answers
//! the read-side questions a public site asks: what runs today and what
//! is in the archive.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::MuseError;
