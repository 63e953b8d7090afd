use thiserror::Error;

/// Boxed error used as the underlying cause of transport and upload failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Cause of a single failed HTTP attempt
#[derive(Debug, Error)]
pub enum TransportFailure {
    /// Connection could not be established or the exchange was interrupted
    #[error("network error: {0}")]
    Network(#[source] BoxError),

    /// The attempt exceeded its per-attempt timeout
    #[error("request timed out: {0}")]
    Timeout(#[source] BoxError),

    /// The server answered with a non-2xx status
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    /// The HTTP client refused to build the request (bad header value, URL, MIME type)
    #[error("invalid request: {0}")]
    Invalid(#[source] BoxError),
}

/// Coarse classification of a [`TransportFailure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Network,
    Timeout,
    HttpStatus,
    InvalidRequest,
}

impl TransportFailure {
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            TransportFailure::Network(_) => TransportErrorKind::Network,
            TransportFailure::Timeout(_) => TransportErrorKind::Timeout,
            TransportFailure::Status { .. } => TransportErrorKind::HttpStatus,
            TransportFailure::Invalid(_) => TransportErrorKind::InvalidRequest,
        }
    }

    /// HTTP status code, if the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportFailure::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Network errors, timeouts, 5xx, 408 and 429 are transient. Any other
    /// status is only retried when `retry_client_errors` is set. Requests
    /// the client could not build are never retried.
    pub fn is_retryable(&self, retry_client_errors: bool) -> bool {
        match self {
            TransportFailure::Network(_) | TransportFailure::Timeout(_) => true,
            TransportFailure::Status { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429 || retry_client_errors
            }
            TransportFailure::Invalid(_) => false,
        }
    }
}

/// Main error type for posting operations
#[derive(Debug, Error)]
pub enum PostError {
    /// The request failed on every allowed attempt (or failed fast on a client error)
    #[error("request failed after {attempts} attempt(s): {cause}")]
    Transport {
        attempts: u32,
        #[source]
        cause: TransportFailure,
    },

    /// Response body is not valid JSON
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Direct file upload to the server-provided URL failed
    #[error("upload of {file} failed: {reason}")]
    Upload {
        file: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Response decoded but lacks a field the next step needs
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Request could not be built
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl PostError {
    /// Create a new upload error
    pub fn upload(file: impl Into<String>, reason: impl Into<String>, source: Option<BoxError>) -> Self {
        PostError::Upload {
            file: file.into(),
            reason: reason.into(),
            source,
        }
    }

    /// Kind of transport failure, if this is a transport error
    pub fn transport_kind(&self) -> Option<TransportErrorKind> {
        match self {
            PostError::Transport { cause, .. } => Some(cause.kind()),
            _ => None,
        }
    }

    /// Get the HTTP status code of the last attempt, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PostError::Transport { cause, .. } => cause.status_code(),
            _ => None,
        }
    }
}

/// Result type for posting operations
pub type Result<T> = std::result::Result<T, PostError>;
