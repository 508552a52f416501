use std::time::Duration;

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer};

use crate::version::error::ConfigError;

// =============================================================================
// Constants
// =============================================================================

/// Timeout when the source does not set one (60 seconds).
///
/// Bounds the idle time between reads of any response and the total time of
/// index requests; downloads may take longer as long as bytes keep arriving.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Timeout for establishing a connection (30 seconds)
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Block size for writing downloaded artifacts; one progress dot per block
pub const CHUNK_SIZE: usize = 1024;

/// Name of the marker file recording the fetched version
pub const VERSION_FILE_NAME: &str = "version";

/// Environment variable enabling verbose logging to stderr
pub const DEBUG_ENV_VAR: &str = "RESOURCE_DEBUG";

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("http-resource/", env!("CARGO_PKG_VERSION"));

/// Source configuration supplied by the orchestrator
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// URI fetched during discovery
    pub index: Option<String>,
    /// Download URI template, may contain `{version}`
    pub uri: Option<String>,
    /// Pattern extracting version tokens from the index document
    pub regex: Option<String>,
    /// Use the index response's ETag header as the version
    #[serde(deserialize_with = "deserialize_truthy")]
    pub etag: bool,
    /// File name template for the saved artifact
    pub filename: Option<String>,
    pub ssl_verify: SslVerify,
    #[serde(deserialize_with = "deserialize_truthy")]
    pub debug: bool,
    /// Timeout in seconds, see [`DEFAULT_TIMEOUT_SECS`]
    pub timeout: Option<u64>,
}

impl SourceConfig {
    pub fn index(&self) -> Result<&str, ConfigError> {
        self.index.as_deref().ok_or(ConfigError::MissingKey("index"))
    }

    pub fn uri(&self) -> Result<&str, ConfigError> {
        self.uri.as_deref().ok_or(ConfigError::MissingKey("uri"))
    }

    pub fn regex(&self) -> Result<&str, ConfigError> {
        self.regex.as_deref().ok_or(ConfigError::MissingKey("regex"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// TLS verification setting: a flag, or a PEM certificate to trust instead
/// of the system roots
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SslVerify {
    Enabled(bool),
    Certificate(String),
}

impl Default for SslVerify {
    fn default() -> Self {
        SslVerify::Enabled(true)
    }
}

/// Returns whether verbose logging to stderr was requested, either through
/// [`DEBUG_ENV_VAR`] or the source's `debug` key.
pub fn debug_requested(source: &SourceConfig) -> bool {
    debug_requested_with_env(std::env::var(DEBUG_ENV_VAR).ok(), source)
}

fn debug_requested_with_env(env_value: Option<String>, source: &SourceConfig) -> bool {
    let env_enabled = env_value.as_deref().is_some_and(is_truthy_text);

    env_enabled || source.debug
}

/// Text counts as enabled unless it is empty, `0` or `false`
fn is_truthy_text(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Read a flag written as a boolean, number, string or null.
///
/// Numbers are enabled when non-zero, strings per [`is_truthy_text`], null
/// is disabled.
fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(false),
        serde_json::Value::Bool(flag) => Ok(flag),
        serde_json::Value::Number(n) => Ok(n.as_f64().is_some_and(|n| n != 0.0)),
        serde_json::Value::String(text) => Ok(is_truthy_text(&text)),
        serde_json::Value::Array(_) => Err(D::Error::invalid_type(
            Unexpected::Seq,
            &"a boolean, number or string flag",
        )),
        serde_json::Value::Object(_) => Err(D::Error::invalid_type(
            Unexpected::Map,
            &"a boolean, number or string flag",
        )),
    }
}
