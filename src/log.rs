//! Diagnostics sink selection
//!
//! The orchestrator shows stderr to the operator and treats stdout as the
//! command's result, so every log line goes to stderr or to a file. Two
//! configurations exist:
//! - verbose: everything at `debug` and above to stderr
//! - quiet: JSON events at `debug` to a private temporary file, `info` and
//!   above to stderr
//!
//! The sink is installed as the current thread's default dispatcher through
//! [`Diagnostics::install`]; nothing is registered process-wide.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Dispatch;
use tracing::dispatcher::DefaultGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::prelude::*;

/// Where verbose logs end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

pub struct Diagnostics {
    dispatch: Dispatch,
    target: LogTarget,
}

impl Diagnostics {
    /// Build the sink for this invocation
    pub fn select(verbose: bool) -> anyhow::Result<Self> {
        if verbose {
            Ok(Self::verbose())
        } else {
            let (file, path) = tempfile::Builder::new()
                .prefix("log")
                .tempfile()?
                .keep()
                .inspect_err(|e| {
                    eprintln!("Failed to create log file: {}", e);
                })?;
            Ok(Self::quiet(file, path))
        }
    }

    fn verbose() -> Self {
        let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        // Use RUST_LOG if set, otherwise default to DEBUG
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer);

        Self {
            dispatch: Dispatch::new(subscriber),
            target: LogTarget::Stderr,
        }
    }

    fn quiet(file: File, path: PathBuf) -> Self {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(Mutex::new(file))
            .fmt_fields(JsonFields::default())
            .with_filter(LevelFilter::DEBUG);

        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .with_filter(LevelFilter::INFO);

        let subscriber = tracing_subscriber::registry()
            .with(json_layer)
            .with(stderr_layer);

        Self {
            dispatch: Dispatch::new(subscriber),
            target: LogTarget::File(path),
        }
    }

    pub fn target(&self) -> &LogTarget {
        &self.target
    }

    /// Path of the private log file, when logging to one
    pub fn log_file(&self) -> Option<&Path> {
        match &self.target {
            LogTarget::File(path) => Some(path),
            LogTarget::Stderr => None,
        }
    }

    /// Make this sink the current thread's default until the guard drops
    pub fn install(&self) -> DefaultGuard {
        tracing::dispatcher::set_default(&self.dispatch)
    }
}
