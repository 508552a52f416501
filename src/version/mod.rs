//! Version discovery and retrieval
//!
//! This module provides the core of the resource: finding versions newer
//! than a known one, and materializing one version's artifact on disk.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Strategy   │────▶│   Index     │     │   Fetcher   │
//! │ (regex/etag)│     │  (fetch)    │     │ (download)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │   Compare   │                         │  Template   │
//! │(loose order)│                         │ (uri/name)  │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`compare`]: Loose ordering of dotted/segmented version strings
//! - [`strategy`]: Discovery trait and strategy selection
//! - [`strategies`]: Regex and ETag discovery implementations
//! - [`index`]: Trait for fetching the remote index
//! - [`fetcher`]: Streaming artifact download and version marker
//! - [`template`]: `{field}` substitution for URIs and file names
//! - [`error`]: Error types for configuration, transport, check and fetch
//! - [`types`]: The `Version` identifier

pub mod compare;
pub mod error;
pub mod fetcher;
pub mod index;
pub mod strategies;
pub mod strategy;
pub mod template;
pub mod types;
