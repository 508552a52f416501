//! Command dispatcher: route one invocation to discovery or fetch
//!
//! ```text
//! stdin JSON ──▶ Request ──┬─ check ──▶ DiscoveryStrategy ──▶ [Version, ...]
//!                          ├─ in ─────▶ ArtifactFetcher ────▶ {version, metadata}
//!                          └─ other ──▶ {}
//! ```

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::http::HttpClient;
use crate::resource::error::ResourceError;
use crate::resource::types::{Command, FetchResult, Request, Response};
use crate::version::fetcher::ArtifactFetcher;
use crate::version::index::IndexClient;
use crate::version::strategy::{Discovery, DiscoveryStrategy};

/// Runs a single command, reporting download progress to `progress`
pub struct Dispatcher<W: Write> {
    progress: W,
}

impl<W: Write> Dispatcher<W> {
    pub fn new(progress: W) -> Self {
        Self { progress }
    }

    /// Consume the dispatcher and return its progress sink
    pub fn into_progress(self) -> W {
        self.progress
    }

    /// Execute `command` for `request`.
    ///
    /// `args` are the positional arguments after the verb; `in` takes the
    /// target directory as the first one.
    pub async fn dispatch(
        &mut self,
        command: &Command,
        request: &Request,
        args: &[String],
    ) -> Result<Response, ResourceError> {
        debug!("command: {}", command.as_str());
        debug!("args: {:?}", args);
        debug!("source: {:?}", request.source);
        debug!("version: {:?}", request.version);
        if let Some(params) = &request.params {
            debug!("params: {}", params);
        }

        match command {
            Command::Check => {
                let client = HttpClient::from_source(&request.source)?;
                self.check(&client, request).await
            }
            Command::In => {
                let target_dir = args.first().ok_or(ResourceError::MissingTargetDir)?;
                self.fetch(Path::new(target_dir), request).await
            }
            Command::Other(name) => {
                info!("Ignoring unsupported command '{}'", name);
                Ok(Response::empty())
            }
        }
    }

    /// Run discovery against `client` with the strategy selected by the source
    pub async fn check(
        &mut self,
        client: &dyn IndexClient,
        request: &Request,
    ) -> Result<Response, ResourceError> {
        let strategy = DiscoveryStrategy::from_source(&request.source)?;
        let versions = strategy
            .discover(client, request.version.as_ref())
            .await?;

        info!("check found {} new version(s)", versions.len());
        Ok(Response::Check(versions))
    }

    async fn fetch(&mut self, target_dir: &Path, request: &Request) -> Result<Response, ResourceError> {
        let version = request
            .version
            .as_ref()
            .ok_or(ResourceError::MissingVersion)?;
        let client = HttpClient::from_source(&request.source)?;

        let fetched = ArtifactFetcher::new(&client)
            .fetch(target_dir, &request.source, version, &mut self.progress)
            .await?;

        Ok(Response::In(FetchResult::new(fetched.version)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::version::error::CheckError;
    use crate::version::index::MockIndexClient;
    use crate::version::types::Version;

    fn regex_request(previous: Option<&str>) -> Request {
        Request {
            source: SourceConfig {
                index: Some("http://example.com/links/10".to_string()),
                regex: Some("href='/links/10/([0-9]+)'".to_string()),
                ..Default::default()
            },
            version: previous.map(Version::new),
            params: None,
        }
    }

    fn links_client() -> MockIndexClient {
        let mut client = MockIndexClient::new();
        client.expect_fetch_document().returning(|_| {
            Ok((0..10)
                .map(|n| format!("<a href='/links/10/{n}'>{n}</a>"))
                .collect())
        });
        client
    }

    #[tokio::test]
    async fn check_returns_newest_without_previous_version() {
        let mut dispatcher = Dispatcher::new(Vec::new());

        let response = dispatcher
            .check(&links_client(), &regex_request(None))
            .await
            .unwrap();

        assert_eq!(response, Response::Check(vec![Version::new("9")]));
    }

    #[tokio::test]
    async fn check_returns_versions_after_previous() {
        let mut dispatcher = Dispatcher::new(Vec::new());

        let response = dispatcher
            .check(&links_client(), &regex_request(Some("7")))
            .await
            .unwrap();

        assert_eq!(
            response,
            Response::Check(vec![Version::new("8"), Version::new("9")])
        );
    }

    #[tokio::test]
    async fn check_with_etag_source_uses_etag_header() {
        let mut client = MockIndexClient::new();
        client
            .expect_fetch_etag()
            .returning(|_| Ok(Some("abc123".to_string())));
        let request = Request {
            source: SourceConfig {
                index: Some("http://example.com/artifact".to_string()),
                etag: true,
                ..Default::default()
            },
            version: Some(Version::new("abc123")),
            params: None,
        };
        let mut dispatcher = Dispatcher::new(Vec::new());

        let response = dispatcher.check(&client, &request).await.unwrap();

        assert_eq!(response, Response::Check(vec![]));
    }

    #[tokio::test]
    async fn check_reports_unknown_previous_version() {
        let mut dispatcher = Dispatcher::new(Vec::new());

        let result = dispatcher
            .check(&links_client(), &regex_request(Some("11")))
            .await;

        assert!(matches!(
            result,
            Err(ResourceError::Check(CheckError::UnknownVersion { .. }))
        ));
    }

    #[tokio::test]
    async fn dispatch_unknown_command_returns_empty_object() {
        let mut dispatcher = Dispatcher::new(Vec::new());

        let response = dispatcher
            .dispatch(&Command::Other("out".to_string()), &Request::default(), &[])
            .await
            .unwrap();

        assert_eq!(response, Response::empty());
    }

    #[tokio::test]
    async fn dispatch_in_requires_target_dir() {
        let mut dispatcher = Dispatcher::new(Vec::new());

        let result = dispatcher
            .dispatch(&Command::In, &regex_request(Some("9")), &[])
            .await;

        assert!(matches!(result, Err(ResourceError::MissingTargetDir)));
    }

    #[tokio::test]
    async fn dispatch_in_requires_version() {
        let mut dispatcher = Dispatcher::new(Vec::new());

        let result = dispatcher
            .dispatch(&Command::In, &regex_request(None), &["/tmp/unused".to_string()])
            .await;

        assert!(matches!(result, Err(ResourceError::MissingVersion)));
    }

    #[tokio::test]
    async fn dispatch_check_without_regex_is_a_config_error() {
        let request = Request {
            source: SourceConfig {
                index: Some("http://example.com/".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::new(Vec::new());

        let result = dispatcher.dispatch(&Command::Check, &request, &[]).await;

        assert!(matches!(result, Err(ResourceError::Config(_))));
    }
}
