// Application state module
// Read-only state shared by every connection

use hyper::header::HeaderValue;
use std::path::PathBuf;

use super::types::{Config, CorsConfig};
use crate::error::{Result, ServerError};

/// CORS header values, validated once at startup
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    pub allow_origin: HeaderValue,
    pub allow_methods: HeaderValue,
    pub allow_headers: HeaderValue,
}

impl CorsHeaders {
    pub fn from_config(cors: &CorsConfig) -> Result<Self> {
        Ok(Self {
            allow_origin: header_value("Access-Control-Allow-Origin", &cors.allow_origin)?,
            allow_methods: header_value("Access-Control-Allow-Methods", &cors.allow_methods)?,
            allow_headers: header_value("Access-Control-Allow-Headers", &cors.allow_headers)?,
        })
    }
}

/// Application state
///
/// Nothing in here changes after startup, so requests share it without locks.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical serving root
    pub root: PathBuf,
    pub cors: CorsHeaders,
    pub server_name: HeaderValue,
}

impl AppState {
    /// Build state from configuration, resolving the serving root.
    ///
    /// Fails when the directory does not exist or is not a directory.
    pub fn new(config: Config) -> Result<Self> {
        let root = config
            .server
            .directory
            .canonicalize()
            .map_err(|source| ServerError::ServingRoot {
                path: config.server.directory.clone(),
                source,
            })?;
        if !root.is_dir() {
            return Err(ServerError::ServingRoot {
                path: config.server.directory.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a directory",
                ),
            });
        }

        let cors = CorsHeaders::from_config(&config.cors)?;
        let server_name = header_value("Server", &config.http.server_name)?;

        Ok(Self {
            config,
            root,
            cors,
            server_name,
        })
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| ServerError::InvalidHeader {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;

    fn config_for(dir: PathBuf) -> Config {
        let overrides = Overrides {
            directory: Some(dir),
            ..Overrides::default()
        };
        Config::load_from("no-such-config-file", &overrides).unwrap()
    }

    #[test]
    fn test_root_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("public")).unwrap();
        let state = AppState::new(config_for(dir.path().join("public/../public"))).unwrap();
        assert_eq!(state.root, dir.path().join("public").canonicalize().unwrap());
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppState::new(config_for(dir.path().join("missing"))).unwrap_err();
        assert!(matches!(err, ServerError::ServingRoot { .. }));
    }

    #[test]
    fn test_file_as_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("version.json");
        std::fs::write(&file, "{}").unwrap();
        let err = AppState::new(config_for(file)).unwrap_err();
        assert!(matches!(err, ServerError::ServingRoot { .. }));
    }

    #[test]
    fn test_invalid_cors_value_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_for(dir.path().to_path_buf());
        cfg.cors.allow_origin = "bad\nvalue".to_string();
        let err = AppState::new(cfg).unwrap_err();
        assert!(matches!(
            err,
            ServerError::InvalidHeader {
                name: "Access-Control-Allow-Origin",
                ..
            }
        ));
    }
}
