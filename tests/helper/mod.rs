//! Shared fixtures for end-to-end tests

mod resource;

#[allow(unused_imports)]
pub use resource::*;
