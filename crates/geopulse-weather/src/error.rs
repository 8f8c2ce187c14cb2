/// Errors that can occur when talking to the weather provider.
///
/// # Examples
///
/// ```rust
/// use geopulse_weather::error::WeatherApiError;
///
/// let err = WeatherApiError::Http { status: 429, body: "rate limited".into() };
/// assert!(err.to_string().contains("429"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WeatherApiError {
    /// Non-2xx status code from the provider.
    #[error("Weather API HTTP error: status={status}, body={body}")]
    Http { status: u16, body: String },

    /// An underlying HTTP transport error from `reqwest`.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON deserialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias so callers can write `error::Result<T>`.
pub type Result<T> = std::result::Result<T, WeatherApiError>;
