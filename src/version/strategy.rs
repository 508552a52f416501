//! Discovery strategy selection
//!
//! Exactly one strategy is active per check:
//! - `etag: true` selects [`EtagStrategy`] (change detection on a single token)
//! - otherwise [`RegexStrategy`] extracts and orders versions from the index

use tracing::debug;

use crate::config::SourceConfig;
use crate::version::error::{CheckError, ConfigError};
use crate::version::index::IndexClient;
use crate::version::strategies::{EtagStrategy, RegexStrategy};
use crate::version::types::Version;

/// Trait for determining which versions are newer than a known one
#[async_trait::async_trait]
pub trait Discovery: Send + Sync {
    /// Returns the versions newer than `previous`, oldest first
    ///
    /// Without a previous version only the current/newest version is
    /// returned. An empty result means nothing changed.
    async fn discover(
        &self,
        client: &dyn IndexClient,
        previous: Option<&Version>,
    ) -> Result<Vec<Version>, CheckError>;
}

/// The strategy chosen for one check
#[derive(Debug)]
pub enum DiscoveryStrategy {
    Regex(RegexStrategy),
    ETag(EtagStrategy),
}

impl DiscoveryStrategy {
    /// Select the strategy described by the source configuration
    pub fn from_source(source: &SourceConfig) -> Result<Self, ConfigError> {
        let index = source.index()?;

        if source.etag {
            debug!("Using ETag discovery for {}", index);
            return Ok(DiscoveryStrategy::ETag(EtagStrategy::new(index)));
        }

        let pattern = source.regex()?;
        debug!("Using regex discovery for {} with pattern {}", index, pattern);
        Ok(DiscoveryStrategy::Regex(RegexStrategy::new(index, pattern)?))
    }
}

#[async_trait::async_trait]
impl Discovery for DiscoveryStrategy {
    async fn discover(
        &self,
        client: &dyn IndexClient,
        previous: Option<&Version>,
    ) -> Result<Vec<Version>, CheckError> {
        match self {
            DiscoveryStrategy::Regex(strategy) => strategy.discover(client, previous).await,
            DiscoveryStrategy::ETag(strategy) => strategy.discover(client, previous).await,
        }
    }
}
