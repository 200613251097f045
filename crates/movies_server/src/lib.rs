//! HTTP server for the movie catalog.

pub mod api;
pub mod config;

pub use api::router;
pub use config::{ConfigError, ServerConfig};
