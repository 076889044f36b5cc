use thiserror::Error;

/// Failure talking to a text-generation endpoint
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Connection failed, DNS, TLS or similar
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    /// Endpoint answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Body was not the JSON shape we expect
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Body parsed but carried no text
    #[error("Response did not contain any generated text")]
    MissingText,
}

impl From<reqwest::Error> for SummaryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SummaryError::Timeout
        } else if err.is_decode() {
            SummaryError::InvalidResponse(err.to_string())
        } else {
            SummaryError::Network(err.to_string())
        }
    }
}

/// Failure reading or writing stored student records
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid stored schedule: {0}")]
    Schedule(#[from] serde_json::Error),

    #[error("Invalid stored timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },
}

/// Rejected intake submission
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Invalid or missing startup configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}
