//! Server lifecycle.
//!
//! [`Server`] owns the configuration and the registry. Binding consumes it
//! into a [`BoundServer`], and running consumes that, so one value can only
//! ever be started once.

pub mod listener;

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::registry::Registry;
use crate::routes::Router;

#[derive(Debug)]
pub enum ServerError {
    /// Binding kept failing until the retry budget ran out
    PortAlreadyInUse {
        addr: String,
        attempts: u32,
        source: std::io::Error,
    },
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::PortAlreadyInUse { addr, attempts, .. } => {
                write!(f, "{addr} is already in use (gave up after {attempts} attempts)")
            }
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::PortAlreadyInUse { source, .. } => Some(source),
        }
    }
}

pub struct Server {
    config: ServerConfig,
    registry: Registry,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let listener = listener::bind_with_retry(&self.config).await?;

        Ok(BoundServer {
            listener,
            router: Router::new(self.registry),
            max_request_bytes: self.config.max_request_bytes,
        })
    }
}

pub struct BoundServer {
    listener: TcpListener,
    router: Router,
    max_request_bytes: usize,
}

impl BoundServer {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn registry(&self) -> &Registry {
        self.router.registry()
    }

    pub async fn run(self) -> anyhow::Result<()> {
        listener::run(self.listener, self.router, self.max_request_bytes).await
    }

    /// Runs until `shutdown` completes. In-flight connections are dropped.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            res = self.run() => res,
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
        }
    }
}
