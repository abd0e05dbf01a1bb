use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database not configured: missing {0}")]
    NotConfigured(&'static str),

    #[error("transport: {0}")]
    Transport(String),

    #[error("remote database: {0}")]
    Remote(String),

    #[error("invalid pipeline response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
