//! Error type for calls against the Miro REST API.

/// Failure of a single Miro API call.
///
/// Every variant keeps the URL (or the offending input) so a caller can
/// report the failure without knowing client internals.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Miro API returned HTTP {status} for {url}: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    InvalidInput(String),
}

impl ApiError {
    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short actionable hint for the most common failure statuses.
    pub fn user_hint(&self) -> Option<&'static str> {
        match self.status()? {
            401 => Some("The Miro token was rejected. Check MIRO_OAUTH_TOKEN or --token."),
            403 => Some("The token lacks the scope required for this board (boards:read / boards:write)."),
            404 => Some("The board or item does not exist or is not shared with this token."),
            429 => Some("Miro rate limit reached. Wait a moment before retrying."),
            _ => None,
        }
    }
}
