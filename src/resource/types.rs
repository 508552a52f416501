//! Request and response envelopes exchanged with the orchestrator

use serde::{Deserialize, Serialize};

use crate::config::SourceConfig;
use crate::resource::error::ResourceError;
use crate::version::types::{Version, deserialize_optional_version};

/// Command verbs understood by the resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Discover versions newer than the given one
    Check,
    /// Fetch a version into the target directory
    In,
    /// Any other verb, answered with an empty object
    Other(String),
}

impl Command {
    pub fn as_str(&self) -> &str {
        match self {
            Command::Check => "check",
            Command::In => "in",
            Command::Other(name) => name,
        }
    }
}

impl std::str::FromStr for Command {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "check" => Command::Check,
            "in" => Command::In,
            other => Command::Other(other.to_string()),
        })
    }
}

/// JSON document read from stdin
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Request {
    pub source: SourceConfig,
    #[serde(deserialize_with = "deserialize_optional_version")]
    pub version: Option<Version>,
    /// Step parameters; accepted for compatibility, not interpreted
    pub params: Option<serde_json::Value>,
}

impl Request {
    /// Parse the raw stdin document
    pub fn parse(input: &str) -> Result<Self, ResourceError> {
        Ok(serde_json::from_str(input)?)
    }
}

/// One key/value annotation attached to a fetched version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    pub name: String,
    pub value: String,
}

/// Result of the `in` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    pub version: Version,
    pub metadata: Vec<MetadataField>,
}

impl FetchResult {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            metadata: Vec::new(),
        }
    }
}

/// JSON document written to stdout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Check(Vec<Version>),
    In(FetchResult),
    Empty(serde_json::Map<String, serde_json::Value>),
}

impl Response {
    pub fn empty() -> Self {
        Response::Empty(serde_json::Map::new())
    }
}
