use thiserror::Error;

use crate::version::error::{CheckError, ConfigError, FetchError};

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Invalid input JSON: {0}")]
    InvalidInput(#[from] serde_json::Error),

    #[error("Missing target directory argument for 'in'")]
    MissingTargetDir,

    #[error("Missing version for 'in'")]
    MissingVersion,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Check failed: {0}")]
    Check(#[from] CheckError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),
}
