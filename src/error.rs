// Unified error type for citysearch.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CitySearchError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Decode error: {reason}")]
    Decode { reason: String },
    #[error("No city loaded")]
    NoCityLoaded,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Shortcut already bound: {0}")]
    ShortcutTaken(String),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

impl CitySearchError {
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CitySearchError>;

// Helper conversions
impl From<config::ConfigError> for CitySearchError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
impl From<std::io::Error> for CitySearchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
impl From<serde_json::Error> for CitySearchError {
    fn from(e: serde_json::Error) -> Self {
        Self::decode(e.to_string())
    }
}
