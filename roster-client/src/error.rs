//! Client error taxonomy.
//!
//! No failure here is fatal to the process: every error is local to one
//! operation and previously cached data stays readable.

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Client-side errors with proper context
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Server unreachable, connection reset, timeout.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response other than the specifically mapped codes.
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// 404 from a detail or mutation endpoint.
    #[error("not found: {0}")]
    NotFound(String),

    /// 401; the in-memory token has been cleared.
    #[error("unauthorized - please login again")]
    Unauthorized,

    /// Form input rejected before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Durable session storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// Response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ClientError {
    /// True for failures the caller may retry by resubmitting the same
    /// operation (nothing retries automatically).
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}
