// Server module entry point
// Binds the listener, runs the accept loop and drives graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

use hyper_util::server::graceful::GracefulShutdown;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::{Result, ServerError};
use crate::logger;

pub use listener::create_listener;

/// A bound update server, ready to run
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Validate configuration, resolve the serving root and bind the listener.
    ///
    /// Bind failures (port in use, missing privilege) are returned as
    /// [`ServerError::Bind`] and are meant to be fatal.
    pub fn bind(config: Config) -> Result<Self> {
        let addr = config.get_socket_addr()?;
        let state = Arc::new(AppState::new(config)?);
        let listener = create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub const fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// The listener is closed as soon as shutdown starts; open connections get
    /// `performance.shutdown_timeout` seconds to finish before being abandoned.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let Self { listener, state } = self;
        let graceful = GracefulShutdown::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            connection::serve_connection(stream, peer_addr, &state, &graceful);
                        }
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                        }
                    }
                }

                () = &mut shutdown => break,
            }
        }

        drop(listener);

        let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
        logger::log_shutdown_started(grace);
        match tokio::time::timeout(grace, graceful.shutdown()).await {
            Ok(()) => logger::log_shutdown_complete(),
            Err(_) => logger::log_shutdown_timeout(grace),
        }

        Ok(())
    }
}
