use bytes::{Buf, BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Status line, headers, blank line, body.
fn encode(resp: &Response) -> BytesMut {
    let mut buf = BytesMut::with_capacity(256 + resp.body.len());

    let status_line = format!(
        "{HTTP_VERSION} {} {}\r\n",
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.put_slice(status_line.as_bytes());

    for (name, value) in &resp.headers {
        buf.put_slice(name.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(value.as_bytes());
        buf.put_slice(b"\r\n");
    }

    buf.put_slice(b"\r\n");
    buf.put_slice(&resp.body);
    buf
}

/// An encoded response and how much of it is still unsent.
pub struct ResponseWriter {
    pending: BytesMut,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            pending: encode(response),
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.remaining()
    }

    /// Writes whatever is left, tolerating short writes, then flushes.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        while self.pending.has_remaining() {
            let n = stream.write(self.pending.chunk()).await?;
            if n == 0 {
                anyhow::bail!("connection closed with {} bytes unsent", self.remaining());
            }
            self.pending.advance(n);
        }

        stream.flush().await?;
        Ok(())
    }
}
