//! LAN update server
//!
//! Serves a directory holding an installable app package and its version
//! descriptor to client devices on the local network. Every response carries
//! permissive CORS headers; `OPTIONS` on any path is acknowledged with an
//! empty 200.

pub mod banner;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod net;
pub mod server;

pub use crate::config::{AppState, Cli, Config, Overrides};
pub use crate::error::{Result, ServerError};
pub use crate::server::Server;
