//! Buffered TCP transport for the command protocol.
//!
//! Requests are single CRLF-terminated lines. Replies are decoded
//! incrementally: bytes accumulate in a read buffer until a full reply
//! can be parsed out of it.

use std::io::Cursor;

use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

use crate::connection::reply::Reply;
use crate::error::{TransportError, WireError};
use crate::executor::Executor;

pub mod reply;

/// One established connection to the store.
///
/// The write half is buffered so a request line is flushed as a unit.
/// There is exactly one `Connection` per client; it is created during
/// construction and released when the client is dropped, never recreated.
#[derive(Debug)]
pub struct Connection {
    stream: BufWriter<TcpStream>,

    // Bytes read from the socket but not yet decoded into a reply.
    buffer: BytesMut,
}

impl Connection {
    /// Wrap an established socket, allocating the read buffer.
    pub fn new(socket: TcpStream) -> Connection {
        Connection {
            stream: BufWriter::new(socket),
            buffer: BytesMut::with_capacity(4 * 1024),
        }
    }

    /// Write one request line, CRLF-terminated, and flush it.
    pub async fn send(&mut self, request: &str) -> Result<(), TransportError> {
        self.stream.write_all(request.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Read a single reply.
    ///
    /// Returns `None` if the peer closed the connection cleanly between
    /// replies. EOF in the middle of a reply is a [`TransportError::Disconnect`].
    pub async fn read_reply(&mut self) -> Result<Option<Reply>, TransportError> {
        loop {
            if let Some(reply) = self.parse_reply()? {
                return Ok(Some(reply));
            }

            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(TransportError::Disconnect);
            }
        }
    }

    /// Attempt to decode one reply from the buffered bytes.
    fn parse_reply(&mut self) -> Result<Option<Reply>, TransportError> {
        let mut buf = Cursor::new(&self.buffer[..]);

        match Reply::check(&mut buf) {
            Ok(()) => {
                // `check` advanced the cursor to the end of the reply, so
                // its position is also the number of bytes to discard once
                // the reply has been parsed.
                let len = buf.position() as usize;

                buf.set_position(0);
                let reply = Reply::parse(&mut buf)?;

                self.buffer.advance(len);

                Ok(Some(reply))
            }
            // Not enough data has arrived yet.
            Err(WireError::Incomplete) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl Executor for Connection {
    async fn execute(&mut self, request: &str) -> Result<Reply, TransportError> {
        self.send(request).await?;

        match self.read_reply().await? {
            Some(reply) => Ok(reply),
            // The server closed the connection without replying.
            None => Err(TransportError::Disconnect),
        }
    }
}
