use thiserror::Error;

/// Failures talking to the web API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no API token configured (set api.token or CADENCE__API__TOKEN)")]
    MissingToken,

    #[error("network error: {0}")]
    Network(String),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("invalid playlist id: {0:?}")]
    InvalidPlaylistId(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
