use std::net::SocketAddr;

use bytes::BytesMut;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::http::handle::ConnectionHandle;
use crate::http::parser::{parse_http_request, parse_request_line, ParseError};
use crate::http::request::Request;
use crate::routes::Router;

pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: BytesMut,
    max_request_bytes: usize,
    router: Router,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, router: Router, max_request_bytes: usize) -> Self {
        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(1024),
            max_request_bytes,
            router,
        }
    }

    /// Serves the single request of this connection.
    ///
    /// The stream is handed over to a [`ConnectionHandle`] once the request
    /// line is read, so that a kill from another connection can answer it.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let Some(parsed) = self.read_request().await? else {
            tracing::trace!(peer = %self.peer, "Connection closed before a request was sent");
            return Ok(());
        };

        let Connection { stream, peer, router, .. } = self;
        let conn = ConnectionHandle::new(stream, Some(peer));

        if let Some(response) = router.respond(parsed, &conn).await {
            if !conn.send(&response).await? {
                tracing::debug!(%peer, "Connection already answered, dropping response");
            }
        }

        Ok(())
    }

    pub async fn read_request(&mut self) -> anyhow::Result<Option<Result<Request, ParseError>>> {
        loop {
            match parse_http_request(&self.buffer) {
                Ok((request, _consumed)) => return Ok(Some(Ok(request))),

                Err(ParseError::Incomplete) => {
                    if self.buffer.len() >= self.max_request_bytes {
                        return Ok(Some(Err(ParseError::TooLarge)));
                    }
                }

                Err(e) => return Ok(Some(Err(e))),
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                // Peer finished sending without a line terminator
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(parse_request_line(&self.buffer)));
            }
        }
    }
}
