//! Typed, error-aware results decoded from wire replies.
//!
//! Every variant owns either decoded data or a [`CommandError`], never
//! both: the failed constructors leave the data empty, so once a result
//! carries an error its value accessors return the empty value on every
//! call.

use crate::connection::reply::Reply;
use crate::error::CommandError;

/// Uniform error accessor shared by every result variant.
pub trait Outcome {
    /// The failure recorded for this operation, if any.
    fn err(&self) -> Option<&CommandError>;

    fn is_err(&self) -> bool {
        self.err().is_some()
    }
}

/// Result of a verb returning at most one value (GET, HGET, TTL, ...).
#[derive(Debug)]
pub struct Scalar {
    value: Option<String>,
    err: Option<CommandError>,
}

impl Scalar {
    pub(crate) fn decode(verb: &'static str, reply: Reply) -> Scalar {
        match reply {
            Reply::Status(msg) => Scalar {
                value: Some(msg),
                err: None,
            },
            Reply::Value(value) => Scalar {
                value: Some(value),
                err: None,
            },
            Reply::Int(num) => Scalar {
                value: Some(num.to_string()),
                err: None,
            },
            Reply::Nil => Scalar {
                value: None,
                err: None,
            },
            Reply::Error(msg) => Scalar::failed(CommandError::Server(msg)),
            reply => Scalar::failed(CommandError::UnexpectedReply {
                verb,
                reply: reply.to_string(),
            }),
        }
    }

    pub(crate) fn failed(err: CommandError) -> Scalar {
        Scalar {
            value: None,
            err: Some(err),
        }
    }

    /// The value, or `None` when the key was absent or the operation
    /// failed.
    ///
    /// A TTL reply of [`TTL_NO_EXPIRY`](crate::consts::TTL_NO_EXPIRY) is a
    /// normal value here, not an error.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The value parsed as a signed integer (LLEN, TTL, HDEL counts, ...).
    pub fn as_i64(&self) -> Option<i64> {
        self.value().and_then(|v| v.parse().ok())
    }

    /// The value interpreted as a boolean (GETBIT and friends).
    pub fn as_bool(&self) -> Option<bool> {
        match self.value()? {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        }
    }
}

impl Outcome for Scalar {
    fn err(&self) -> Option<&CommandError> {
        self.err.as_ref()
    }
}

/// Result of a verb signaling success or failure with no payload
/// (SET, DEL, EXPIRE, ...).
#[derive(Debug)]
pub struct Status {
    message: Option<String>,
    err: Option<CommandError>,
}

impl Status {
    pub(crate) fn decode(verb: &'static str, reply: Reply) -> Status {
        match reply {
            Reply::Status(msg) => Status {
                message: Some(msg),
                err: None,
            },
            Reply::Value(msg) => Status {
                message: Some(msg),
                err: None,
            },
            Reply::Int(num) => Status {
                message: Some(num.to_string()),
                err: None,
            },
            Reply::Nil => Status {
                message: None,
                err: None,
            },
            Reply::Error(msg) => Status::failed(CommandError::Server(msg)),
            reply => Status::failed(CommandError::UnexpectedReply {
                verb,
                reply: reply.to_string(),
            }),
        }
    }

    pub(crate) fn failed(err: CommandError) -> Status {
        Status {
            message: None,
            err: Some(err),
        }
    }

    /// Whether the operation succeeded.
    pub fn is_ok(&self) -> bool {
        self.err.is_none()
    }

    /// The server's status message, if it sent one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Outcome for Status {
    fn err(&self) -> Option<&CommandError> {
        self.err.as_ref()
    }
}

/// Result of a verb returning an ordered multi-value payload
/// (HKEYS, HVALS, KEYS, LRANGE).
#[derive(Debug)]
pub struct List {
    items: Vec<String>,
    err: Option<CommandError>,
}

impl List {
    pub(crate) fn decode(verb: &'static str, reply: Reply) -> List {
        match reply {
            Reply::List(entries) => {
                let mut items = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        Reply::Status(msg) => items.push(msg),
                        Reply::Value(value) => items.push(value),
                        Reply::Int(num) => items.push(num.to_string()),
                        entry => {
                            return List::failed(CommandError::UnexpectedReply {
                                verb,
                                reply: entry.to_string(),
                            })
                        }
                    }
                }
                List { items, err: None }
            }
            // An absent container decodes as an empty sequence.
            Reply::Nil => List {
                items: Vec::new(),
                err: None,
            },
            Reply::Error(msg) => List::failed(CommandError::Server(msg)),
            reply => List::failed(CommandError::UnexpectedReply {
                verb,
                reply: reply.to_string(),
            }),
        }
    }

    pub(crate) fn failed(err: CommandError) -> List {
        List {
            items: Vec::new(),
            err: Some(err),
        }
    }

    /// The decoded items, in server order. Empty when the operation
    /// failed, and also — validly — when the sequence itself was empty.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the result, keeping only the items.
    pub fn into_items(self) -> Vec<String> {
        self.items
    }
}

impl Outcome for List {
    fn err(&self) -> Option<&CommandError> {
        self.err.as_ref()
    }
}
