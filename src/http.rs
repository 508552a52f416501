//! HTTP transport shared by discovery and fetch
//!
//! Builds one `reqwest::Client` per invocation from the source's TLS and
//! timeout settings. A PEM certificate given as `ssl_verify` is staged to a
//! private temporary file, read back from that path as the only trust
//! anchor, and removed when the client is dropped.
//!
//! The configured timeout bounds the idle time between reads on every
//! request, and the total time of index requests. Artifact downloads have
//! no total limit so large bodies can stream for as long as bytes arrive.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use reqwest::{Certificate, Client, Response};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::{CONNECT_TIMEOUT_SECS, SourceConfig, SslVerify, USER_AGENT};
use crate::version::error::{ConfigError, TransportError};
use crate::version::index::IndexClient;

/// A certificate body staged to a private temporary file
#[derive(Debug)]
pub struct TrustAnchor {
    file: NamedTempFile,
}

impl TrustAnchor {
    /// Write `pem` to a new uniquely named file readable only by this user
    pub fn stage(pem: &str) -> Result<Self, ConfigError> {
        let mut file = tempfile::Builder::new()
            .prefix("ssl-")
            .suffix(".pem")
            .tempfile()?;
        file.write_all(pem.as_bytes())?;
        file.flush()?;
        debug!("Staged trust anchor at {:?}", file.path());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Load the staged certificates from its path.
    ///
    /// The body must contain at least one parseable PEM certificate.
    pub fn certificates(&self) -> Result<Vec<Certificate>, ConfigError> {
        let pem = std::fs::read(self.path())?;
        let certificates = Certificate::from_pem_bundle(&pem)
            .map_err(|e| ConfigError::InvalidCertificate(e.to_string()))?;

        if certificates.is_empty() {
            return Err(ConfigError::InvalidCertificate(
                "no PEM certificate found".to_string(),
            ));
        }

        Ok(certificates)
    }
}

/// HTTP client configured for one source
pub struct HttpClient {
    client: Client,
    index_timeout: Duration,
    // keeps the staged certificate on disk for the client's lifetime
    _trust_anchor: Option<TrustAnchor>,
}

impl HttpClient {
    pub fn from_source(source: &SourceConfig) -> Result<Self, ConfigError> {
        Self::build(&source.ssl_verify, source.request_timeout())
    }

    pub fn build(ssl_verify: &SslVerify, timeout: Duration) -> Result<Self, ConfigError> {
        let builder = Client::builder()
            .user_agent(USER_AGENT)
            .read_timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS));

        let (builder, trust_anchor) = match ssl_verify {
            SslVerify::Enabled(true) => (builder, None),
            SslVerify::Enabled(false) => {
                warn!("TLS certificate verification is disabled");
                (builder.danger_accept_invalid_certs(true), None)
            }
            SslVerify::Certificate(pem) => {
                let anchor = TrustAnchor::stage(pem)?;
                let builder = builder.tls_certs_only(anchor.certificates()?);
                (builder, Some(anchor))
            }
        };

        Ok(Self {
            client: builder.build().map_err(ConfigError::Client)?,
            index_timeout: timeout,
            _trust_anchor: trust_anchor,
        })
    }

    /// Issue a GET and fail on any non-success status.
    ///
    /// The body is not read, so callers can stream it. Only the idle time
    /// between reads is bounded.
    pub async fn get(&self, url: &str) -> Result<Response, TransportError> {
        self.send(url, None).await
    }

    /// Like [`HttpClient::get`], with the whole exchange bounded by the
    /// configured timeout
    async fn get_index(&self, url: &str) -> Result<Response, TransportError> {
        self.send(url, Some(self.index_timeout)).await
    }

    async fn send(&self, url: &str, total: Option<Duration>) -> Result<Response, TransportError> {
        debug!("GET {}", url);
        let mut request = self.client.get(url);
        if let Some(total) = total {
            request = request.timeout(total);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {} returned status {}", url, status);
            return Err(TransportError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl IndexClient for HttpClient {
    async fn fetch_document(&self, url: &str) -> Result<String, TransportError> {
        Ok(self.get_index(url).await?.text().await?)
    }

    async fn fetch_etag(&self, url: &str) -> Result<Option<String>, TransportError> {
        let response = self.get_index(url).await?;
        Ok(response
            .headers()
            .get(reqwest::header::ETAG)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned()))
    }
}
