use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Why a request for a day's invoices produced no usable records.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("response was not a list of invoices: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => FetchError::Status(code),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Could not determine a config directory. Pass one with --config-dir.")]
    NoConfigDir,

    #[error("Invalid date '{input}'. Expected {expected}")]
    InvalidDate { input: String, expected: String },

    #[error("Invalid date format '{0}' in config")]
    InvalidDateFormat(String),

    #[error("Date {date} is outside the selectable range {min} to {max}")]
    DateOutOfRange {
        date: String,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
