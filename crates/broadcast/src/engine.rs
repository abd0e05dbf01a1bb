//! The rate-limited fan-out loop.

use crate::Sender;
use db::{Database, params};
use std::time::Duration;
use tracing::{info, warn};

/// Fixed pause after every send. Telegram documents roughly 30 messages per
/// second for bots; 10/s keeps aggregate throughput an order of magnitude
/// clear of that ceiling.
pub const DEFAULT_SEND_DELAY: Duration = Duration::from_millis(100);

/// Per-broadcast delivery counts. Always sums to the number of recipients
/// read at the start of the sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub sent: u64,
    pub failed: u64,
}

impl Outcome {
    pub fn total(&self) -> u64 {
        self.sent + self.failed
    }
}

/// Delivers one message to every known user, at a bounded rate.
pub struct Broadcaster<S> {
    db: Database,
    sender: Option<S>,
    delay: Duration,
}

impl<S: Sender> Broadcaster<S> {
    /// `sender` is `None` when no bot token is configured; broadcasts are
    /// then skipped with a warning instead of failing.
    pub fn new(db: Database, sender: Option<S>) -> Self {
        Self {
            db,
            sender,
            delay: DEFAULT_SEND_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Send `title`/`body` to every user known at call time.
    ///
    /// Never fails: missing configuration or an unreachable user table logs
    /// a warning and returns zero counts. The triggering write has already
    /// committed by the time this runs, so there is nobody left to throw to.
    pub async fn broadcast(&self, title: &str, body: &str) -> Outcome {
        let Some(sender) = &self.sender else {
            warn!("broadcast skipped: no bot token configured");
            return Outcome::default();
        };

        let recipients = match self.recipients().await {
            Ok(recipients) => recipients,
            Err(e) => {
                warn!("broadcast aborted: could not read recipients: {e}");
                return Outcome::default();
            }
        };

        info!(recipients = recipients.len(), "starting broadcast");
        let text = format_message(title, body);
        let outcome = self.deliver(sender, &recipients, &text).await;
        info!(
            sent = outcome.sent,
            failed = outcome.failed,
            "broadcast complete"
        );
        outcome
    }

    /// Live read of the recipient set. Users registered after this returns
    /// are not picked up by the current sweep.
    async fn recipients(&self) -> db::Result<Vec<i64>> {
        let rows = self
            .db
            .fetch_all("SELECT telegram_id FROM users", params![])
            .await?;
        Ok(rows.iter().filter_map(|row| row.i64("telegram_id")).collect())
    }

    async fn deliver(&self, sender: &S, recipients: &[i64], text: &str) -> Outcome {
        let mut outcome = Outcome::default();
        for &chat_id in recipients {
            match sender.send(chat_id, text).await {
                Ok(()) => outcome.sent += 1,
                Err(e) => {
                    warn!(chat_id, "send failed: {e}");
                    outcome.failed += 1;
                }
            }
            // Pause after every send, success or not. The loop's only
            // suspension point.
            tokio::time::sleep(self.delay).await;
        }
        outcome
    }
}

fn format_message(title: &str, body: &str) -> String {
    format!("\u{1F4E2} *{title}*\n\n{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SendError;
    use db::DbConfig;
    use std::sync::Mutex;

    /// Fails every chat id at or above `fail_from`, records every attempt.
    struct MockSender {
        fail_from: i64,
        attempts: Mutex<Vec<i64>>,
    }

    impl MockSender {
        fn failing_from(fail_from: i64) -> Self {
            Self {
                fail_from,
                attempts: Mutex::new(Vec::new()),
            }
        }
    }

    impl Sender for MockSender {
        async fn send(&self, chat_id: i64, _text: &str) -> Result<(), SendError> {
            self.attempts.lock().unwrap().push(chat_id);
            if chat_id >= self.fail_from {
                Err(SendError::Network("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    fn broadcaster(sender: Option<MockSender>) -> Broadcaster<MockSender> {
        let db = Database::new(DbConfig {
            url: "libsql://unused.example".into(),
            auth_token: "token".into(),
        })
        .unwrap();
        Broadcaster::new(db, sender).with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn counts_sum_when_every_send_succeeds() {
        let b = broadcaster(Some(MockSender::failing_from(i64::MAX)));
        let recipients: Vec<i64> = (1..=5).collect();
        let outcome = b
            .deliver(b.sender.as_ref().unwrap(), &recipients, "hi")
            .await;
        assert_eq!(outcome, Outcome { sent: 5, failed: 0 });
        assert_eq!(outcome.total(), 5);
    }

    #[tokio::test]
    async fn counts_sum_under_total_outage() {
        let b = broadcaster(Some(MockSender::failing_from(0)));
        let recipients: Vec<i64> = (1..=7).collect();
        let outcome = b
            .deliver(b.sender.as_ref().unwrap(), &recipients, "hi")
            .await;
        assert_eq!(outcome, Outcome { sent: 0, failed: 7 });
        assert_eq!(outcome.total(), 7);
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_sweep() {
        let b = broadcaster(Some(MockSender::failing_from(3)));
        let recipients: Vec<i64> = (1..=5).collect();
        let outcome = b
            .deliver(b.sender.as_ref().unwrap(), &recipients, "hi")
            .await;
        assert_eq!(outcome, Outcome { sent: 2, failed: 3 });

        let attempts = b.sender.as_ref().unwrap().attempts.lock().unwrap().clone();
        assert_eq!(attempts, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn missing_sender_returns_zero_counts() {
        let b = broadcaster(None);
        let outcome = b.broadcast("title", "body").await;
        assert_eq!(outcome, Outcome::default());
    }

    #[tokio::test(start_paused = true)]
    async fn delay_bounds_throughput() {
        let b = broadcaster(Some(MockSender::failing_from(i64::MAX)))
            .with_delay(Duration::from_millis(100));
        let recipients: Vec<i64> = (1..=50).collect();

        let started = tokio::time::Instant::now();
        let outcome = b
            .deliver(b.sender.as_ref().unwrap(), &recipients, "hi")
            .await;
        assert_eq!(outcome.total(), 50);
        assert!(
            started.elapsed() >= Duration::from_secs(5),
            "50 sends at 100ms must take at least 5s, took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn message_format_emphasizes_title() {
        assert_eq!(
            format_message("Gates open", "See you there."),
            "\u{1F4E2} *Gates open*\n\nSee you there."
        );
    }
}
