use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::routes::Router;
use crate::server::ServerError;

/// Binds `cfg.listen_addr`, retrying with exponential backoff.
pub async fn bind_with_retry(cfg: &ServerConfig) -> Result<TcpListener, ServerError> {
    let attempts = cfg.bind_attempts.max(1);
    let mut attempt = 1;

    loop {
        match TcpListener::bind(&cfg.listen_addr).await {
            Ok(listener) => {
                info!(addr = %cfg.listen_addr, attempt, "Listening");
                return Ok(listener);
            }
            Err(source) if attempt >= attempts => {
                error!(addr = %cfg.listen_addr, attempts, error = %source, "Address is already in use");
                return Err(ServerError::PortAlreadyInUse {
                    addr: cfg.listen_addr.clone(),
                    attempts,
                    source,
                });
            }
            Err(e) => {
                let delay = cfg.retry_delay(attempt);
                warn!(
                    addr = %cfg.listen_addr,
                    attempt,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Bind failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Accepts connections forever, one task each.
pub async fn run(listener: TcpListener, router: Router, max_request_bytes: usize) -> anyhow::Result<()> {
    let active = Arc::new(AtomicUsize::new(0));

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "Failed to accept connection");
                continue;
            }
        };

        let guard = ActiveConnection::enter(&active);
        info!(%peer, active = guard.count, "Accepted connection");

        let router = router.clone();
        tokio::spawn(async move {
            let conn = Connection::new(socket, peer, router, max_request_bytes);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
            drop(guard);
        });
    }
}

struct ActiveConnection {
    active: Arc<AtomicUsize>,
    count: usize,
}

impl ActiveConnection {
    fn enter(active: &Arc<AtomicUsize>) -> Self {
        let count = active.fetch_add(1, Ordering::Relaxed) + 1;
        Self {
            active: Arc::clone(active),
            count,
        }
    }
}

impl Drop for ActiveConnection {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
    }
}
