use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaberuError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("HTTP error {status} from {url}")]
    Http { status: u16, url: String },

    #[error("{0}")]
    LocationUnavailable(String),

    #[error("Directory fetch failed: {0}")]
    DirectoryFetchFailed(String),

    #[error("Enrichment failed for {name}: {reason}")]
    EnrichmentFailed { name: String, reason: String },

    #[error("No results for {0}")]
    EmptyResultSet(String),

    #[error("No reviews API key configured (set TABERU_REVIEWS_API_KEY)")]
    MissingApiKey,

    #[error("TaberuError: {0}")]
    Custom(String),
}

impl TaberuError {
    /// Drops that are expected in normal operation and only worth a debug line.
    pub fn is_quiet_drop(&self) -> bool {
        matches!(self, TaberuError::EmptyResultSet(_))
    }
}

impl From<std::io::Error> for TaberuError {
    fn from(error: std::io::Error) -> Self {
        TaberuError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for TaberuError {
    fn from(error: reqwest::Error) -> Self {
        TaberuError::Reqwest(Box::new(error))
    }
}
