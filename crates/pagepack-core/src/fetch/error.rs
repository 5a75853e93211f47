//! Remote fetch error type.

/// Why a download did not yield a body. Always recoverable: the resolver
/// turns it into a placeholder.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The URL could not be built from the upstream config.
    #[error("invalid URL: {0}")]
    Url(String),
}

impl FetchError {
    /// True for transport timeouts (connect or whole-transfer).
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Curl(e) if e.is_operation_timedout())
    }
}
