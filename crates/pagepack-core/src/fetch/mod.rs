//! Remote fetch: downloads a whole body into memory with one GET.
//!
//! Uses the curl crate (libcurl). Failures are reported as [`FetchError`] and
//! never retried; the resolver falls through to a placeholder instead.

mod error;

pub use error::FetchError;

use std::time::Duration;

use crate::config::HttpConfig;

/// Blocking byte fetcher. Called from `spawn_blocking` by the resolver.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// libcurl-backed fetcher.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlFetcher {
    pub fn new(http: &HttpConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(http.connect_timeout_secs),
            timeout: Duration::from_secs(http.timeout_secs),
        }
    }
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self::new(&HttpConfig::default())
    }
}

impl Fetch for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        Ok(body)
    }
}
