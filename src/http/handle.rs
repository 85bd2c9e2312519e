//! Shared write side of a client connection.
//!
//! Every connection is answered with at most one response followed by a
//! close. The handle enforces this: the first `send` takes the writer out of
//! its slot, later calls find it empty and write nothing. Handles are cheap
//! to clone, which lets a kill request answer a sleeping connection it does
//! not own.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

#[derive(Clone)]
pub struct ConnectionHandle {
    inner: Arc<Inner>,
}

struct Inner {
    peer: Option<SocketAddr>,
    writer: Mutex<Option<BoxedWriter>>,
}

impl ConnectionHandle {
    pub fn new<W>(writer: W, peer: Option<SocketAddr>) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                peer,
                writer: Mutex::new(Some(Box::new(writer))),
            }),
        }
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.inner.peer
    }

    /// Writes `response` and shuts the connection down.
    ///
    /// Returns `Ok(false)` without writing if the connection was already
    /// answered.
    pub async fn send(&self, response: &Response) -> anyhow::Result<bool> {
        let mut slot = self.inner.writer.lock().await;
        let Some(mut writer) = slot.take() else {
            return Ok(false);
        };

        ResponseWriter::new(response)
            .write_to_stream(&mut writer)
            .await?;
        writer.shutdown().await?;

        tracing::debug!(
            peer = ?self.inner.peer,
            status = response.status.as_u16(),
            "Sent response"
        );
        Ok(true)
    }

    pub async fn is_answered(&self) -> bool {
        self.inner.writer.lock().await.is_none()
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("peer", &self.inner.peer)
            .finish_non_exhaustive()
    }
}
