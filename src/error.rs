use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Failure of a single connect attempt against one candidate address.
#[derive(Error, Debug)]
pub enum DialError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One (address, cause) pair recorded during connection establishment.
#[derive(Debug)]
pub struct ConnectAttempt {
    /// The address that was tried.
    pub addr: String,

    /// Why the attempt failed.
    pub cause: DialError,
}

/// Every candidate address failed during construction.
///
/// Attempts are kept in the order they were made so callers can inspect
/// each individual failure, not just the last one.
#[derive(Debug)]
pub struct ConnectError {
    attempts: Vec<ConnectAttempt>,
}

impl ConnectError {
    pub(crate) fn new(attempts: Vec<ConnectAttempt>) -> ConnectError {
        ConnectError { attempts }
    }

    /// The failed attempts, in attempt order.
    pub fn attempts(&self) -> &[ConnectAttempt] {
        &self.attempts
    }
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not connect to any server address ({} attempts failed)",
            self.attempts.len()
        )?;
        for attempt in &self.attempts {
            write!(f, "\n  {}: {}", attempt.addr, attempt.cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConnectError {}

/// Error encountered while decoding a reply from the wire.
///
/// Only `Incomplete` errors are handled at runtime (more bytes are read
/// from the socket). All other errors result in the connection being
/// terminated.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("not enough data is available to decode a reply")]
    Incomplete,

    #[error("invalid reply encoding: {0}")]
    Parse(String),

    #[error(transparent)]
    ParseInt(#[from] std::num::TryFromIntError),

    #[error(transparent)]
    ParseUtf8(#[from] std::string::FromUtf8Error),
}

/// Failure of the transport while delivering a request or reply.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection reset by peer")]
    Disconnect,

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failure carried inside a command result.
///
/// Execution and server failures are always returned through the result's
/// error accessor rather than raised at the call site. No variant triggers
/// an automatic retry; that is left to callers.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The executor failed to deliver a reply.
    #[error("could not execute {verb}: {source}")]
    Transport {
        verb: &'static str,
        #[source]
        source: TransportError,
    },

    /// The caller's deadline expired before a reply arrived.
    #[error("{verb} aborted after {limit:?}")]
    DeadlineExceeded { verb: &'static str, limit: Duration },

    /// The store accepted the request but reported a failure.
    #[error("server error: {0}")]
    Server(String),

    /// The store replied with a payload shape the verb cannot produce.
    #[error("unexpected reply for {verb}: {reply}")]
    UnexpectedReply { verb: &'static str, reply: String },
}
