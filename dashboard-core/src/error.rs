use thiserror::Error;

/// Why a bundle could not be assembled for a city.
///
/// Every variant is recoverable by the user re-entering a city; none of them
/// is retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider answered, but with a non-OK status code.
    #[error("City '{city}' not found: {message}")]
    CityNotFound { city: String, message: String },

    /// Network, timeout or body-read failure.
    #[error("Request to weather provider failed: {0}")]
    Transport(String),

    /// Body was not JSON or did not match the expected schema.
    #[error("Failed to parse weather provider response: {0}")]
    Parse(String),

    /// The forecast series was empty or otherwise unusable.
    #[error("Weather provider returned a malformed bundle: {0}")]
    MalformedBundle(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::CityNotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export buffer error: {0}")]
    Buffer(String),
}
