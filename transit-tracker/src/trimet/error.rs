//! TriMet client error types.

/// Errors from the TriMet web services client.
#[derive(Debug, thiserror::Error)]
pub enum TrimetError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}{}", .body.as_deref().map(|b| format!(" (body: {b})")).unwrap_or_default())]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code, or an error inside `resultSet`
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// App id missing or rejected
    #[error("unauthorized: check TRIMET_APP_ID")]
    Unauthorized,

    /// Response had no `resultSet`
    #[error("response has no result set")]
    MissingResultSet,
}
