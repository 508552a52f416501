//! Index trait for reading the remote document that lists versions

#[cfg(test)]
use mockall::automock;

use crate::version::error::TransportError;

/// Trait for fetching the index used during discovery
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait IndexClient: Send + Sync {
    /// GETs `url` and returns the response body as text
    ///
    /// # Returns
    /// * `Ok(String)` - The body of a successful response
    /// * `Err(TransportError)` - Network failure or non-success status
    async fn fetch_document(&self, url: &str) -> Result<String, TransportError>;

    /// GETs `url` and returns its ETag header verbatim, if any
    async fn fetch_etag(&self, url: &str) -> Result<Option<String>, TransportError>;
}
