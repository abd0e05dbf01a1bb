//! Identity resolution and interaction append.

use chrono::{DateTime, Utc};
use db::{Database, params};
use tracing::{debug, warn};

/// Matches the store's own `datetime('now')` output, so client-side stamps
/// and store-side stamps collate together.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn format_timestamp(t: DateTime<Utc>) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

fn now() -> String {
    format_timestamp(Utc::now())
}

/// Records bot interactions against the remote store.
pub struct Recorder {
    db: Database,
}

impl Recorder {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record one interaction.
    ///
    /// Fire-and-forget: if the identity cannot be resolved or the store is
    /// unreachable, the event is logged and dropped. This method never fails.
    pub async fn record(&self, telegram_id: i64, action: &str, metadata: Option<&str>) {
        if let Err(e) = self.try_record(telegram_id, action, metadata).await {
            warn!(telegram_id, action, "interaction dropped: {e}");
        }
    }

    async fn try_record(
        &self,
        telegram_id: i64,
        action: &str,
        metadata: Option<&str>,
    ) -> db::Result<()> {
        let Some(user_id) = self.resolve(telegram_id).await? else {
            debug!(telegram_id, "identity unresolved after insert, dropping event");
            return Ok(());
        };

        let stamp = now();
        self.db
            .execute_write(
                "INSERT INTO telemetry (user_id, action, metadata, created_at) VALUES (?, ?, ?, ?)",
                params![user_id, action, metadata, stamp.as_str()],
            )
            .await?;

        // Unconditional liveness refresh; the active-in-24h aggregate reads this.
        self.db
            .execute_write(
                "UPDATE users SET last_active = ? WHERE telegram_id = ?",
                params![stamp.as_str(), telegram_id],
            )
            .await?;

        Ok(())
    }

    /// Look up the internal id for a Telegram user, creating the identity on
    /// first contact. Insert-or-ignore plus re-select: the unique constraint
    /// on `telegram_id` is what arbitrates concurrent first contacts, not
    /// application-side locking.
    async fn resolve(&self, telegram_id: i64) -> db::Result<Option<i64>> {
        if let Some(row) = self
            .db
            .fetch_one(
                "SELECT id FROM users WHERE telegram_id = ?",
                params![telegram_id],
            )
            .await?
        {
            return Ok(row.i64("id"));
        }

        let stamp = now();
        self.db
            .execute_write(
                "INSERT OR IGNORE INTO users (telegram_id, created_at, last_active) VALUES (?, ?, ?)",
                params![telegram_id, stamp.as_str(), stamp.as_str()],
            )
            .await?;

        let row = self
            .db
            .fetch_one(
                "SELECT id FROM users WHERE telegram_id = ?",
                params![telegram_id],
            )
            .await?;
        Ok(row.and_then(|row| row.i64("id")))
    }

    /// Explicit registration, from the bot's `/start` handler.
    ///
    /// Unlike [`Recorder::record`] this surfaces errors — the caller asked
    /// for the registration and should know if it did not happen.
    pub async fn register(&self, telegram_id: i64, username: Option<&str>) -> db::Result<()> {
        let stamp = now();
        self.db
            .execute_write(
                "INSERT OR IGNORE INTO users (telegram_id, username, created_at, last_active) VALUES (?, ?, ?, ?)",
                params![telegram_id, username, stamp.as_str(), stamp.as_str()],
            )
            .await?;
        self.db
            .execute_write(
                "UPDATE users SET last_active = ? WHERE telegram_id = ?",
                params![stamp.as_str(), telegram_id],
            )
            .await?;
        Ok(())
    }
}
