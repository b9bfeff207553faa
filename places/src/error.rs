use thiserror::Error;

/// Errors from the places API client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network, timeout or non-2xx failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a `status` other than the ones the call accepts.
    #[error("places API status {status}: {}", message.as_deref().unwrap_or("no message"))]
    ApiStatus { status: String, message: Option<String> },

    /// A details response without a `result` object.
    #[error("places API returned no result for {0}")]
    MissingResult(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
