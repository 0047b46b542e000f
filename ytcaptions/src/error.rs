use std::time::Duration;

/// All errors that can occur in ytcaptions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not on a watch page; open a /watch?v=… or /shorts/… URL")]
    NotOnWatchPage,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("{label} timed out after {}s", .after.as_secs_f64())]
    Timeout { label: String, after: Duration },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("caption metadata not found: {0}")]
    NotFound(String),

    #[error("no captions available (none published, restricted, or premiere not started)")]
    NoCaptions,

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
