use thiserror::Error;

#[derive(Error, Debug)]
pub enum BattlecardError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Rate limited by reader service, try again later")]
    RateLimited,

    #[error("Content service unavailable: HTTP {0}")]
    ServiceUnavailable(u16),

    #[error("Rendering service credential not configured")]
    FallbackNotConfigured,

    #[error("Rendering service rejected the configured credential")]
    InvalidCredential,

    #[error("Could not extract meaningful content from this URL. Try pasting the page content instead.")]
    NoContentExtracted,

    #[error("Extraction returned malformed output: {0}")]
    ExtractionParse(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Competitor not found: {0}")]
    CompetitorNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BattlecardError>;
