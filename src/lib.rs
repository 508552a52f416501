pub mod config;
pub mod http;
pub mod log;
pub mod resource;
pub mod version;
