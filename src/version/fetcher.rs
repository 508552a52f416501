//! Artifact fetcher: download one version into a target directory
//!
//! Produces two files:
//! - `<target>/<file name>` with the artifact bytes
//! - `<target>/version` with the bare version string
//!
//! Any stale marker is removed before the download starts and the new one is
//! written only once the artifact is complete, so a failed fetch never
//! leaves a marker describing bytes that are not there. The artifact itself
//! is written in place; a crash mid-download leaves a partial file.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use reqwest::Url;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::{CHUNK_SIZE, SourceConfig, VERSION_FILE_NAME};
use crate::http::HttpClient;
use crate::version::error::{FetchError, TransportError};
use crate::version::template::render;
use crate::version::types::Version;

/// Outcome of a completed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    pub version: Version,
    /// Where the artifact bytes were written
    pub path: PathBuf,
    pub bytes_written: u64,
}

pub struct ArtifactFetcher<'a> {
    client: &'a HttpClient,
}

impl<'a> ArtifactFetcher<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Download `version` into `target_dir`, writing one progress dot per
    /// block to `progress`.
    pub async fn fetch<W: Write>(
        &self,
        target_dir: &Path,
        source: &SourceConfig,
        version: &Version,
        progress: &mut W,
    ) -> Result<FetchedArtifact, FetchError> {
        let uri = render(source.uri()?, version)?;
        let file_name = resolve_file_name(source.filename.as_deref(), &uri, version)?;

        tokio::fs::create_dir_all(target_dir).await?;
        let artifact_path = target_dir.join(&file_name);
        let marker_path = target_dir.join(VERSION_FILE_NAME);
        remove_stale_marker(&marker_path).await?;

        let mut response = self.client.get(&uri).await?;
        let expected = response.content_length();
        debug!(
            "Downloading {} to {:?} ({:?} bytes declared)",
            uri, artifact_path, expected
        );

        let mut file = tokio::fs::File::create(&artifact_path).await?;
        let mut written: u64 = 0;

        loop {
            let chunk = match response.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => match expected {
                    // the connection closed short of the declared length
                    Some(expected) if written < expected => {
                        debug!("Body ended after {} bytes: {}", written, e);
                        return Err(FetchError::Truncated { expected, written });
                    }
                    _ => return Err(TransportError::from(e).into()),
                },
            };
            for block in chunk.chunks(CHUNK_SIZE) {
                file.write_all(block).await?;
                written += block.len() as u64;
                progress.write_all(b".")?;
            }
            progress.flush()?;
        }
        file.flush().await?;
        file.sync_all().await?;
        writeln!(progress)?;

        if let Some(expected) = expected
            && expected != written
        {
            return Err(FetchError::Truncated { expected, written });
        }

        tokio::fs::write(&marker_path, version.version.as_bytes()).await?;
        info!(
            "Fetched version {} ({} bytes) to {:?}",
            version, written, artifact_path
        );

        Ok(FetchedArtifact {
            version: version.clone(),
            path: artifact_path,
            bytes_written: written,
        })
    }
}

/// Resolve the name the artifact is saved under.
///
/// A configured `filename` template wins; otherwise the percent-decoded last
/// path segment of the rendered download URI is used. The result must be a plain file name
/// that cannot escape the target directory or clobber the version marker.
pub fn resolve_file_name(
    template: Option<&str>,
    uri: &str,
    version: &Version,
) -> Result<String, FetchError> {
    let name = match template {
        Some(template) => render(template, version)?,
        None => last_path_segment(uri).unwrap_or_default(),
    };

    if is_plain_file_name(&name) && name != VERSION_FILE_NAME {
        Ok(name)
    } else {
        Err(FetchError::InvalidFileName(name))
    }
}

fn last_path_segment(uri: &str) -> Option<String> {
    match Url::parse(uri) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(decode),
        // not an absolute URL; fall back to the raw text after the last slash
        Err(_) => uri.rsplit('/').next().map(decode),
    }
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

async fn remove_stale_marker(path: &Path) -> Result<(), FetchError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!("Removed stale version marker {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
