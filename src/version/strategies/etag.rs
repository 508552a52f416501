//! ETag discovery: the index response's ETag header is the version
//!
//! ETags carry no ordering, so there is never a backlog: the result is
//! either the current token (changed or first check) or empty (unchanged).

use tracing::debug;

use crate::version::error::CheckError;
use crate::version::index::IndexClient;
use crate::version::strategy::Discovery;
use crate::version::types::Version;

#[derive(Debug)]
pub struct EtagStrategy {
    index: String,
}

impl EtagStrategy {
    pub fn new(index: &str) -> Self {
        Self {
            index: index.to_string(),
        }
    }

    /// Select the versions to report for the current ETag
    pub fn select(
        &self,
        current: Option<String>,
        previous: Option<&Version>,
    ) -> Result<Vec<Version>, CheckError> {
        let current = current.ok_or_else(|| CheckError::MissingEtag {
            index: self.index.clone(),
        })?;

        match previous {
            Some(previous) if previous.version == current => {
                debug!("ETag {} unchanged for {}", current, self.index);
                Ok(Vec::new())
            }
            _ => Ok(vec![Version::new(current)]),
        }
    }
}

#[async_trait::async_trait]
impl Discovery for EtagStrategy {
    async fn discover(
        &self,
        client: &dyn IndexClient,
        previous: Option<&Version>,
    ) -> Result<Vec<Version>, CheckError> {
        let current = client.fetch_etag(&self.index).await?;
        self.select(current, previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::index::MockIndexClient;
    use rstest::rstest;

    const INDEX: &str = "http://example.com/artifact";

    #[rstest]
    #[case(None, Some("abc123"))] // first check
    #[case(Some("abc123"), None)] // unchanged
    #[case(Some("xyz789"), Some("abc123"))] // changed
    #[case(Some("\"abc123\""), Some("abc123"))] // quoting is significant
    fn select_compares_tokens_for_equality(
        #[case] previous: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let strategy = EtagStrategy::new(INDEX);
        let previous = previous.map(Version::new);

        let result = strategy
            .select(Some("abc123".to_string()), previous.as_ref())
            .unwrap();

        assert_eq!(result, expected.map(Version::new).into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn select_without_etag_fails() {
        let strategy = EtagStrategy::new(INDEX);

        let result = strategy.select(None, Some(&Version::new("abc123")));

        assert!(matches!(
            result,
            Err(CheckError::MissingEtag { index }) if index == INDEX
        ));
    }

    #[tokio::test]
    async fn discover_reads_etag_from_index() {
        let mut client = MockIndexClient::new();
        client
            .expect_fetch_etag()
            .withf(|url| url == INDEX)
            .times(1)
            .returning(|_| Ok(Some("\"33a64df5\"".to_string())));
        client.expect_fetch_document().never();

        let result = EtagStrategy::new(INDEX).discover(&client, None).await.unwrap();

        assert_eq!(result, vec![Version::new("\"33a64df5\"")]);
    }
}
