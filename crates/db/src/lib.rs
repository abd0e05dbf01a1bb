//! Remote SQL access over the hosted database's HTTP pipeline API.
//!
//! Mela's data lives in a hosted SQLite database that is reachable only over
//! HTTP. This crate is the one place that speaks that protocol: it turns a
//! SQL string plus positional arguments into a single pipeline round trip and
//! decodes the typed result set that comes back.
//!
//! # Overview
//!
//! Every call is one `POST {endpoint}/v2/pipeline` carrying exactly one
//! `execute` operation followed by a `close`. There is no session reuse, no
//! batching, and no transaction support — each statement stands alone, and
//! [`Database`] holds no mutable state, so it can be cloned and called from
//! independent tasks freely.
//!
//! # Core Concepts
//!
//! ## Database
//!
//! [`Database`] owns the HTTP client and the endpoint credentials. It is
//! constructed from an explicit [`DbConfig`]; construction fails fast when
//! the URL or token is missing, before any network traffic.
//!
//! ## Arg
//!
//! Positional statement arguments are the closed union [`Arg`]. The wire
//! protocol has no boolean type, so `Arg::Bool` marshals as integer 0/1 —
//! the union makes that mapping an exhaustive match instead of a runtime
//! type check. The [`params!`] macro builds an argument slice from plain
//! Rust values at the call site.
//!
//! ## ResultSet and Row
//!
//! [`ResultSet`] is the decoded shape of a statement result: column names,
//! rows of bare JSON values, and the affected-row count. It projects into
//! named [`Row`] mappings or positional tuples depending on what the caller
//! needs.
//!
//! # Example
//!
//! ```no_run
//! use db::{Database, DbConfig, params};
//!
//! # async fn example() -> db::Result<()> {
//! let db = Database::new(DbConfig {
//!     url: "libsql://mela-fest.turso.io".into(),
//!     auth_token: "ey...".into(),
//! })?;
//!
//! db.execute_write(
//!     "INSERT INTO announcements (title, message, created_at) VALUES (?, ?, datetime('now'))",
//!     params!["Gates open", "See you at the main stage."],
//! )
//! .await?;
//!
//! if let Some(row) = db.fetch_one("SELECT COUNT(*) AS count FROM users", params![]).await? {
//!     println!("{} users", row.i64("count").unwrap_or(0));
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod rows;
mod value;
mod wire;

pub use client::{Database, DbConfig};
pub use error::{Error, Result};
pub use rows::{ResultSet, Row};
pub use value::Arg;

/// Build a positional argument slice from plain Rust values.
///
/// Each value is converted through [`Arg::from`], so anything with an
/// `Into<Arg>` conversion works: integers, floats, booleans, strings, and
/// `Option`s of those (`None` becomes SQL NULL).
///
/// ```
/// use db::{params, Arg};
///
/// let args = params![42, "hello", None::<&str>];
/// assert_eq!(args[2], Arg::Null);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[] as &[$crate::Arg]
    };
    ($($arg:expr),+ $(,)?) => {
        &[$($crate::Arg::from($arg)),+][..]
    };
}
