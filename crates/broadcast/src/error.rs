use thiserror::Error;

/// A single send that did not reach the messaging API, or was rejected by it.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("network: {0}")]
    Network(String),

    #[error("messaging api returned {status}: {body}")]
    Status { status: u16, body: String },
}
