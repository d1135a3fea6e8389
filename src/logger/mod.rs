//! Logger module
//!
//! Logging utilities for the update server:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use std::time::Duration;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info(&format!("[Server] Listening on: http://{addr}"));
    write_info(&format!(
        "[Server] Serving directory: {}",
        config.server.directory.display()
    ));
    if let Some(workers) = config.server.workers {
        write_info(&format!("[Server] Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("[Server] Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("[Server] Error log: {path}"));
    }
}

pub fn log_connection_error(err: &hyper::Error) {
    write_error(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_signal_received(signal: &str) {
    write_info(&format!("[Signal] {signal} received, shutting down"));
}

pub fn log_shutdown_started(grace: Duration) {
    write_info(&format!(
        "[Shutdown] Listener closed, waiting up to {}s for open connections",
        grace.as_secs()
    ));
}

pub fn log_shutdown_complete() {
    write_info("[Shutdown] All connections closed");
}

pub fn log_shutdown_timeout(grace: Duration) {
    log_warning(&format!(
        "[Shutdown] Connections still open after {}s, abandoning them",
        grace.as_secs()
    ));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
