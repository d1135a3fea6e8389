// Configuration module entry point
// Loads layered configuration and builds the shared runtime state

mod cli;
mod state;
mod types;

use std::net::SocketAddr;

pub use cli::Cli;
pub use state::{AppState, CorsHeaders};
pub use types::{
    Config, CorsConfig, HttpConfig, LoggingConfig, Overrides, PerformanceConfig, ServerConfig,
    UpdateConfig,
};

use crate::error::{Result, ServerError};

/// Prefix for environment overrides, e.g. `UPDATE_SERVER_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "UPDATE_SERVER";

impl Config {
    /// Load configuration from specified file path (without extension).
    ///
    /// Precedence, lowest first: built-in defaults, the optional config file,
    /// `UPDATE_SERVER_*` environment variables, command-line overrides.
    pub fn load_from(config_path: &str, overrides: &Overrides) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.directory", ".")?
            .set_default("update.version_file", "version.json")?
            .set_default("update.package_file", "app-release.apk")?
            .set_default("cors.allow_origin", "*")?
            .set_default("cors.allow_methods", "GET, OPTIONS")?
            .set_default("cors.allow_headers", "Content-Type")?
            .set_default("http.server_name", "update-server")?
            .set_default("http.cache_control", "no-cache")?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .set_default("http.directory_listing", true)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.header_read_timeout", 30)?
            .set_default("performance.shutdown_timeout", 10)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .set_override_option(
                "server.directory",
                overrides
                    .directory
                    .as_ref()
                    .map(|dir| dir.to_string_lossy().into_owned()),
            )?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr> {
        let value = format!("{}:{}", self.server.host, self.server.port);
        value
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
                value,
                reason: e.to_string(),
            })
    }
}
