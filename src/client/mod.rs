//! Client construction and address failover.
//!
//! Candidate addresses are tried strictly in order, each under a bounded
//! timeout. The first success is adopted as the client's sole connection;
//! if every candidate fails, construction fails with an error carrying
//! one entry per attempt. There is no retry loop across the list and no
//! reconnection once the client exists.

use std::time::Duration;

use log::{debug, warn};
use tokio::net::TcpStream;
use tokio::time;

use crate::connection::Connection;
use crate::consts::CONNECT_TIMEOUT;
use crate::error::{ConnectAttempt, ConnectError, DialError};

pub mod ops;

pub use ops::Client;

impl Client {
    /// Establish a session with the first reachable address.
    ///
    /// `primary` is tried first, then each entry of `alternates` in order.
    /// Every attempt is bounded by [`CONNECT_TIMEOUT`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kvlink::client::Client;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = match Client::connect("localhost:6379", &["localhost:6380"]).await {
    ///         Ok(client) => client,
    ///         Err(err) => panic!("failed to establish connection: {}", err),
    ///     };
    /// # drop(client);
    /// }
    /// ```
    pub async fn connect(primary: &str, alternates: &[&str]) -> Result<Client, ConnectError> {
        Client::connect_with_timeout(primary, alternates, CONNECT_TIMEOUT).await
    }

    /// Like [`connect`](Client::connect), with an explicit per-attempt
    /// timeout.
    ///
    /// Attempts are sequential, never concurrent, so the primary address
    /// keeps deterministic preference and a degraded cluster is not hit
    /// with a burst of simultaneous dials.
    pub async fn connect_with_timeout(
        primary: &str,
        alternates: &[&str],
        per_attempt: Duration,
    ) -> Result<Client, ConnectError> {
        let mut attempts = Vec::new();

        for addr in std::iter::once(primary).chain(alternates.iter().copied()) {
            match time::timeout(per_attempt, TcpStream::connect(addr)).await {
                Ok(Ok(socket)) => {
                    debug!("connected to {}", addr);
                    // Earlier failures are irrelevant once one address
                    // accepts; they are dropped here.
                    return Ok(Client::with_executor(Connection::new(socket)));
                }
                Ok(Err(err)) => {
                    warn!("connect to {} failed: {}", addr, err);
                    attempts.push(ConnectAttempt {
                        addr: addr.to_string(),
                        cause: DialError::Io(err),
                    });
                }
                Err(_) => {
                    warn!("connect to {} timed out after {:?}", addr, per_attempt);
                    attempts.push(ConnectAttempt {
                        addr: addr.to_string(),
                        cause: DialError::Timeout(per_attempt),
                    });
                }
            }
        }

        Err(ConnectError::new(attempts))
    }
}
