//! The client facade: one operation per verb.
//!
//! Every operation composes the same pipeline: encode the command into a
//! request line, execute it (optionally under a deadline), decode the
//! reply into the verb's result kind.

use std::time::Duration;

use log::debug;
use tokio::time;

use crate::cmd::Command;
use crate::connection::reply::Reply;
use crate::connection::Connection;
use crate::error::CommandError;
use crate::executor::Executor;
use crate::result::{List, Scalar, Status};

/// Established session with a key-value store.
///
/// Holds exactly one executor, by default a [`Connection`] adopted during
/// [`connect`](Client::connect). Operations borrow the client mutably, so
/// a single client issues one request at a time. Dropping the client
/// releases the connection; there is no reconnect, and ownership makes
/// use-after-close unrepresentable.
///
/// Every operation takes an optional `deadline`. `None` leaves the call
/// bounded only by the transport; `Some(limit)` aborts the wait once
/// `limit` elapses and records a deadline failure in the result. Aborting
/// one operation does not affect the connection or any other operation.
#[derive(Debug)]
pub struct Client<E = Connection> {
    executor: E,
}

impl<E: Executor> Client<E> {
    /// Wrap an already-established executor.
    ///
    /// This is the seam for custom transports and for tests driving the
    /// client against a scripted executor.
    pub fn with_executor(executor: E) -> Client<E> {
        Client { executor }
    }

    /// Encode and execute `cmd`, honoring the deadline.
    async fn request(
        &mut self,
        cmd: &Command,
        deadline: Option<Duration>,
    ) -> Result<Reply, CommandError> {
        let line = cmd.encode();
        debug!("request: {}", line);

        let result = match deadline {
            Some(limit) => match time::timeout(limit, self.executor.execute(&line)).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(CommandError::DeadlineExceeded {
                        verb: cmd.verb(),
                        limit,
                    })
                }
            },
            None => self.executor.execute(&line).await,
        };

        let reply = result.map_err(|source| CommandError::Transport {
            verb: cmd.verb(),
            source,
        })?;
        debug!("reply: {:?}", reply);

        Ok(reply)
    }

    async fn scalar(&mut self, cmd: Command, deadline: Option<Duration>) -> Scalar {
        match self.request(&cmd, deadline).await {
            Ok(reply) => Scalar::decode(cmd.verb(), reply),
            Err(err) => Scalar::failed(err),
        }
    }

    async fn status(&mut self, cmd: Command, deadline: Option<Duration>) -> Status {
        match self.request(&cmd, deadline).await {
            Ok(reply) => Status::decode(cmd.verb(), reply),
            Err(err) => Status::failed(err),
        }
    }

    async fn list(&mut self, cmd: Command, deadline: Option<Duration>) -> List {
        match self.request(&cmd, deadline).await {
            Ok(reply) => List::decode(cmd.verb(), reply),
            Err(err) => List::failed(err),
        }
    }

    /// Get the value stored at `key`.
    ///
    /// An absent key decodes as a scalar without a value, not as an error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kvlink::client::Client;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let mut client = Client::connect("localhost:6379", &[]).await.unwrap();
    ///
    ///     let val = client.get("foo", None).await;
    ///     println!("Got = {:?}", val.value());
    /// }
    /// ```
    pub async fn get(&mut self, key: &str, deadline: Option<Duration>) -> Scalar {
        self.scalar(Command::new("GET").arg(key), deadline).await
    }

    /// Set `key` to hold `value`.
    ///
    /// If the key already holds a value it is overwritten.
    pub async fn set(&mut self, key: &str, value: &str, deadline: Option<Duration>) -> Status {
        self.status(Command::new("SET").arg(key).arg(value), deadline)
            .await
    }

    /// Delete `key`.
    pub async fn del(&mut self, key: &str, deadline: Option<Duration>) -> Status {
        self.status(Command::new("DEL").arg(key), deadline).await
    }

    /// Set the expiration of `key` to now + `seconds`.
    pub async fn expire(&mut self, key: &str, seconds: u64, deadline: Option<Duration>) -> Status {
        self.status(
            Command::new("EXPIRE").arg(key).arg(seconds.to_string()),
            deadline,
        )
        .await
    }

    /// The bit at `offset` in the string stored at `key`.
    pub async fn getbit(&mut self, key: &str, offset: u64, deadline: Option<Duration>) -> Scalar {
        self.scalar(
            Command::new("GETBIT").arg(key).arg(offset.to_string()),
            deadline,
        )
        .await
    }

    /// Set or clear the bit at `offset` in the string stored at `key`.
    pub async fn setbit(
        &mut self,
        key: &str,
        offset: u64,
        value: bool,
        deadline: Option<Duration>,
    ) -> Status {
        self.status(
            Command::new("SETBIT")
                .arg(key)
                .arg(offset.to_string())
                .arg(if value { "1" } else { "0" }),
            deadline,
        )
        .await
    }

    /// The value associated with `field` in the hash stored at `key`.
    pub async fn hget(&mut self, key: &str, field: &str, deadline: Option<Duration>) -> Scalar {
        self.scalar(Command::new("HGET").arg(key).arg(field), deadline)
            .await
    }

    /// Set `field` in the hash stored at `key` to `value`.
    pub async fn hset(
        &mut self,
        key: &str,
        field: &str,
        value: &str,
        deadline: Option<Duration>,
    ) -> Status {
        self.status(
            Command::new("HSET").arg(key).arg(field).arg(value),
            deadline,
        )
        .await
    }

    /// All fields of the hash stored at `key`.
    pub async fn hkeys(&mut self, key: &str, deadline: Option<Duration>) -> List {
        self.list(Command::new("HKEYS").arg(key), deadline).await
    }

    /// All values of the hash stored at `key`.
    pub async fn hvals(&mut self, key: &str, deadline: Option<Duration>) -> List {
        self.list(Command::new("HVALS").arg(key), deadline).await
    }

    /// Delete one or more fields from the hash stored at `key`.
    ///
    /// Returns the number of fields removed as a scalar.
    pub async fn hdel(
        &mut self,
        key: &str,
        field: &str,
        more_fields: &[&str],
        deadline: Option<Duration>,
    ) -> Scalar {
        self.scalar(
            Command::new("HDEL")
                .arg(key)
                .arg(field)
                .args(more_fields.iter().copied()),
            deadline,
        )
        .await
    }

    /// All keys matching `pattern`.
    pub async fn keys(&mut self, pattern: &str, deadline: Option<Duration>) -> List {
        self.list(Command::new("KEYS").arg(pattern), deadline).await
    }

    /// The element at `index` in the list stored at `key`.
    pub async fn lindex(&mut self, key: &str, index: i64, deadline: Option<Duration>) -> Scalar {
        self.scalar(
            Command::new("LINDEX").arg(key).arg(index.to_string()),
            deadline,
        )
        .await
    }

    /// The number of elements in the list stored at `key`.
    pub async fn llen(&mut self, key: &str, deadline: Option<Duration>) -> Scalar {
        self.scalar(Command::new("LLEN").arg(key), deadline).await
    }

    /// Remove and return the first element of the list stored at `key`.
    pub async fn lpop(&mut self, key: &str, deadline: Option<Duration>) -> Scalar {
        self.scalar(Command::new("LPOP").arg(key), deadline).await
    }

    /// Prepend `value` to the list stored at `key`.
    pub async fn lpush(&mut self, key: &str, value: &str, deadline: Option<Duration>) -> Status {
        self.status(Command::new("LPUSH").arg(key).arg(value), deadline)
            .await
    }

    /// Append one or more values to the list stored at `key`.
    pub async fn rpush(
        &mut self,
        key: &str,
        value: &str,
        more_values: &[&str],
        deadline: Option<Duration>,
    ) -> Status {
        self.status(
            Command::new("RPUSH")
                .arg(key)
                .arg(value)
                .args(more_values.iter().copied()),
            deadline,
        )
        .await
    }

    /// The elements between `start` and `stop` (zero-based, inclusive) of
    /// the list stored at `key`.
    pub async fn lrange(
        &mut self,
        key: &str,
        start: i64,
        stop: i64,
        deadline: Option<Duration>,
    ) -> List {
        self.list(
            Command::new("LRANGE")
                .arg(key)
                .arg(start.to_string())
                .arg(stop.to_string()),
            deadline,
        )
        .await
    }

    /// Remove occurrences of `value` from the list stored at `key`.
    pub async fn lrem(&mut self, key: &str, value: &str, deadline: Option<Duration>) -> Status {
        self.status(Command::new("LREM").arg(key).arg(value), deadline)
            .await
    }

    /// Ping the server.
    ///
    /// Returns `PONG` if no message is provided, otherwise a copy of the
    /// message. Often used to test whether a connection is still alive.
    pub async fn ping(&mut self, msg: Option<&str>, deadline: Option<Duration>) -> Scalar {
        let mut cmd = Command::new("PING");
        if let Some(msg) = msg {
            cmd = cmd.arg(msg);
        }
        self.scalar(cmd, deadline).await
    }

    /// The length of the string stored at `key`.
    pub async fn strlen(&mut self, key: &str, deadline: Option<Duration>) -> Scalar {
        self.scalar(Command::new("STRLEN").arg(key), deadline).await
    }

    /// The remaining time to live of `key`, in seconds.
    ///
    /// A key without an expiration decodes to
    /// [`TTL_NO_EXPIRY`](crate::consts::TTL_NO_EXPIRY), a normal value.
    pub async fn ttl(&mut self, key: &str, deadline: Option<Duration>) -> Scalar {
        self.scalar(Command::new("TTL").arg(key), deadline).await
    }

    /// The data type name of the value stored at `key`.
    pub async fn type_of(&mut self, key: &str, deadline: Option<Duration>) -> Scalar {
        self.scalar(Command::new("TYPE").arg(key), deadline).await
    }
}
