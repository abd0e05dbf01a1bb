//! Interaction recording and usage aggregates.
//!
//! Every tap in the bot's menus lands here: the [`Recorder`] resolves the
//! Telegram user to an internal identity row (creating it on first contact),
//! appends one interaction row, and refreshes the identity's last-active
//! timestamp — the signal the activity aggregates read.
//!
//! Recording is fire-and-forget. A bot interaction must never fail because
//! the analytics store hiccuped, so [`Recorder::record`] swallows and logs
//! every failure. [`Recorder::register`] (the explicit `/start` registration
//! path) and [`stats::snapshot`] (the admin dashboard read) surface errors
//! normally.

pub mod stats;

mod recorder;

pub use recorder::Recorder;
