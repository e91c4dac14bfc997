use thiserror::Error;

/// Failure of a single outbound request, before any status handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed")]
    Connect,
    #[error("transport failure: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Why a lookup did not produce a follower count.
///
/// The `Display` text is what ends up in `LookupResult::error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Request timeout - Roblox servers may be slow")]
    Timeout,
    #[error("Unable to connect to Roblox servers")]
    ConnectionFailure,
    #[error("HTTP error: {0}")]
    HttpError(u16),
    #[error("User not found")]
    NotFound,
    #[error("Could not extract follower count from profile page")]
    ExtractionIncomplete { username: Option<String> },
    #[error("An unexpected error occurred")]
    Unexpected(String),
}

impl LookupError {
    /// Timeouts and connection failures stop the pipeline; nothing else does.
    pub fn terminal(err: &TransportError) -> Option<Self> {
        match err {
            TransportError::Timeout => Some(LookupError::Timeout),
            TransportError::Connect => Some(LookupError::ConnectionFailure),
            TransportError::Other(_) => None,
        }
    }
}

impl From<TransportError> for LookupError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => LookupError::Timeout,
            TransportError::Connect => LookupError::ConnectionFailure,
            TransportError::Other(detail) => LookupError::Unexpected(detail),
        }
    }
}
