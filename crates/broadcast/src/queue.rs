//! Detached worker handoff.

use crate::{Broadcaster, Sender};
use tokio::sync::mpsc;
use tracing::info;

struct Job {
    title: String,
    body: String,
}

/// Handle for enqueueing broadcast jobs onto a background worker.
///
/// The worker owns the rate-limited loop, so the caller that triggered the
/// announcement returns immediately; the outcome is observable only through
/// logs. Jobs still queued at process shutdown are lost, and a sweep in
/// flight is truncated — no resumption state is kept.
#[derive(Clone)]
pub struct BroadcastQueue {
    tx: mpsc::UnboundedSender<Job>,
}

impl BroadcastQueue {
    /// Spawn the worker task and return the enqueue handle.
    pub fn spawn<S: Sender + 'static>(broadcaster: Broadcaster<S>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let outcome = broadcaster.broadcast(&job.title, &job.body).await;
                info!(
                    title = %job.title,
                    sent = outcome.sent,
                    failed = outcome.failed,
                    "broadcast finished"
                );
            }
        });
        Self { tx }
    }

    /// Hand a broadcast to the worker. Never blocks.
    pub fn enqueue(&self, title: impl Into<String>, body: impl Into<String>) {
        let _ = self.tx.send(Job {
            title: title.into(),
            body: body.into(),
        });
    }
}
