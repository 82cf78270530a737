use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToudiError {
    #[error(
        "API rate limit exceeded, resets at {}; set a token to raise the limit",
        .reset.format("%Y-%m-%d %H:%M:%S UTC")
    )]
    RateLimited { reset: DateTime<Utc> },

    #[error("authentication failed; check the configured token")]
    Unauthorized,

    #[error("request failed with HTTP {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ToudiError>;
