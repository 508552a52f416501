//! Regex discovery: extract version tokens from an index document
//!
//! Every match of the pattern contributes one version. Matches are not
//! deduplicated, so a pattern that matches the same version twice yields it
//! twice; sources must use a pattern precise enough for their index.

use regex::Regex;
use tracing::debug;

use crate::version::compare::sort_versions;
use crate::version::error::{CheckError, ConfigError};
use crate::version::index::IndexClient;
use crate::version::strategy::Discovery;
use crate::version::types::{VERSION_KEY, Version};

#[derive(Debug)]
pub struct RegexStrategy {
    index: String,
    pattern: Regex,
}

impl RegexStrategy {
    pub fn new(index: &str, pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            index: index.to_string(),
            pattern: Regex::new(pattern)?,
        })
    }

    /// Collect the version token of every match, in document order.
    ///
    /// The token is the `version` named group when the pattern has one,
    /// otherwise the first capturing group, otherwise the whole match.
    /// Matches where the selected group did not participate are skipped.
    pub fn extract(&self, document: &str) -> Vec<String> {
        let group = if self.pattern.capture_names().flatten().any(|n| n == VERSION_KEY) {
            Group::Named
        } else if self.pattern.captures_len() > 1 {
            Group::First
        } else {
            Group::Whole
        };

        self.pattern
            .captures_iter(document)
            .filter_map(|caps| {
                let m = match group {
                    Group::Named => caps.name(VERSION_KEY),
                    Group::First => caps.get(1),
                    Group::Whole => caps.get(0),
                };
                m.map(|m| m.as_str().to_string())
            })
            .collect()
    }

    /// Select the versions to report from an already fetched document
    pub fn select(
        &self,
        document: &str,
        previous: Option<&Version>,
    ) -> Result<Vec<Version>, CheckError> {
        let mut versions = self.extract(document);
        sort_versions(&mut versions);
        debug!("Found {} versions in {}", versions.len(), self.index);

        let Some(previous) = previous else {
            return versions
                .pop()
                .map(|latest| vec![Version::new(latest)])
                .ok_or_else(|| CheckError::NoVersions {
                    index: self.index.clone(),
                });
        };

        // First occurrence is the cut point; later duplicates are reported
        let position = versions
            .iter()
            .position(|v| *v == previous.version)
            .ok_or_else(|| CheckError::UnknownVersion {
                version: previous.version.clone(),
                index: self.index.clone(),
            })?;

        Ok(versions
            .into_iter()
            .skip(position + 1)
            .map(Version::new)
            .collect())
    }
}

#[derive(Debug, Clone, Copy)]
enum Group {
    Named,
    First,
    Whole,
}

#[async_trait::async_trait]
impl Discovery for RegexStrategy {
    async fn discover(
        &self,
        client: &dyn IndexClient,
        previous: Option<&Version>,
    ) -> Result<Vec<Version>, CheckError> {
        let document = client.fetch_document(&self.index).await?;
        self.select(&document, previous)
    }
}
