//! The request/response capability a client executes commands through.

use async_trait::async_trait;

use crate::connection::reply::Reply;
use crate::error::TransportError;

/// Sends one encoded request line and returns the reply.
///
/// The default implementation is [`Connection`](crate::connection::Connection);
/// alternative transports plug in through
/// [`Client::with_executor`](crate::client::Client::with_executor).
///
/// A client drives its executor through `&mut self`, so a single client
/// has at most one request in flight at a time. An executor shared more
/// widely than that must provide its own serialization.
#[async_trait]
pub trait Executor: Send {
    /// Transmit `request` and return exactly one reply, or the transport
    /// failure that prevented it.
    ///
    /// A failure reported by the store itself is a normal
    /// [`Reply::Error`] payload, not an `Err`.
    async fn execute(&mut self, request: &str) -> Result<Reply, TransportError>;
}
