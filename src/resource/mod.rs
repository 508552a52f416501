//! Orchestrator-facing layer: request parsing, command routing, output shape

pub mod dispatcher;
pub mod error;
pub mod types;

pub use dispatcher::Dispatcher;
pub use error::ResourceError;
pub use types::{Command, FetchResult, Request, Response};
