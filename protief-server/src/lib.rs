//! Content and upload endpoints for the ProTief site.

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod port;
pub mod presentation;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::ServerError;
pub use server::{serve, serve_with_listener};
