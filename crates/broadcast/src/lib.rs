//! Mass-broadcast fan-out for announcements.
//!
//! When an announcement is created, every user the bot has ever seen gets a
//! copy. This crate owns that sweep: the recipient read, the per-recipient
//! send through the Telegram Bot API, the fixed inter-send delay that keeps
//! us under Telegram's rate ceiling, and the success/failure accounting.
//!
//! The engine is built to run unattended. It never propagates an error past
//! its own boundary — a missing token, an unreachable user table, or a full
//! outage of the messaging API all end in a logged warning and a countable
//! [`Outcome`], never a panic or an `Err` in the caller's lap.
//!
//! [`Broadcaster::broadcast`] runs one sweep inline; [`BroadcastQueue`]
//! hands sweeps to a detached worker task so the triggering caller returns
//! immediately.

mod engine;
mod error;
mod queue;
mod telegram;

pub use engine::{Broadcaster, DEFAULT_SEND_DELAY, Outcome};
pub use error::SendError;
pub use queue::BroadcastQueue;
pub use telegram::{Sender, TelegramSender};
