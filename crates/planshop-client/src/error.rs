//! Client error types.

/// Errors returned by the Planshop client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error response.
    #[error("API error ({status}): {code} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code.
        code: String,
        /// Human-readable message.
        message: String,
    },

    /// The base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
