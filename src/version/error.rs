use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required source key: {0}")]
    MissingKey(&'static str),

    #[error("Invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("Invalid certificate in ssl_verify: {0}")]
    InvalidCertificate(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to stage certificate: {0}")]
    Staging(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GET {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Unknown field '{field}' in template '{template}'")]
    UnknownField { field: String, template: String },

    #[error("Unbalanced braces in template '{template}'")]
    Unbalanced { template: String },
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Response from {index} has no ETag header")]
    MissingEtag { index: String },

    #[error("Previous version '{version}' not found in {index}")]
    UnknownVersion { version: String, index: String },

    #[error("No versions found in {index}")]
    NoVersions { index: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Cannot save artifact as '{0}'")]
    InvalidFileName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Truncated download: expected {expected} bytes, wrote {written}")]
    Truncated { expected: u64, written: u64 },
}
