//! Structured reply payloads and their wire decoder.
//!
//! A reply is one of a closed set of shapes: a status line, an error line,
//! a signed integer, a single length-prefixed value, an explicit nil, or
//! an ordered sequence of replies. Which shape a verb produces is decided
//! by the result decoder, not here.

use std::fmt;
use std::io::Cursor;

use atoi::atoi;
use bytes::Buf;

use crate::error::WireError;

/// A single reply from the store.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// Success status with a message, e.g. `OK` or `PONG`.
    Status(String),
    /// Server-reported failure.
    Error(String),
    /// Signed integer. Negative values are meaningful (the TTL sentinel).
    Int(i64),
    /// A single value.
    Value(String),
    /// Explicit absence of a value.
    Nil,
    /// Ordered sequence of replies.
    List(Vec<Reply>),
}

impl fmt::Display for Reply {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reply::Status(msg) => msg.fmt(fmt),
            Reply::Error(msg) => write!(fmt, "error: {}", msg),
            Reply::Int(num) => num.fmt(fmt),
            Reply::Value(value) => value.fmt(fmt),
            Reply::Nil => "(nil)".fmt(fmt),
            Reply::List(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(fmt, " ")?;
                    }
                    entry.fmt(fmt)?;
                }
                Ok(())
            }
        }
    }
}

impl Reply {
    /// Checks if an entire reply can be decoded from `src`.
    ///
    /// Returns [`WireError::Incomplete`] when more bytes are needed; the
    /// caller reads from the socket and tries again.
    pub fn check(src: &mut Cursor<&[u8]>) -> Result<(), WireError> {
        match get_u8(src)? {
            b'+' | b'-' => {
                get_line(src)?;
                Ok(())
            }
            b':' => {
                let _ = get_int(src)?;
                Ok(())
            }
            b'$' => {
                if b'-' == peek_u8(src)? {
                    // Skip '-1\r\n'
                    skip(src, 4)
                } else {
                    let len: usize = get_int(src)?.try_into()?;

                    // skip that number of bytes + 2 (\r\n).
                    skip(src, len + 2)
                }
            }
            b'*' => {
                let len = get_int(src)?;

                for _ in 0..len {
                    Reply::check(src)?;
                }

                Ok(())
            }
            actual => Err(WireError::Parse(format!(
                "invalid reply type byte `{}`",
                actual
            ))),
        }
    }

    /// Decode one reply. The bytes must already have been validated with
    /// [`check`](Reply::check).
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Reply, WireError> {
        match get_u8(src)? {
            b'+' => {
                let line = get_line(src)?.to_vec();
                Ok(Reply::Status(String::from_utf8(line)?))
            }
            b'-' => {
                let line = get_line(src)?.to_vec();
                Ok(Reply::Error(String::from_utf8(line)?))
            }
            b':' => Ok(Reply::Int(get_int(src)?)),
            b'$' => {
                if b'-' == peek_u8(src)? {
                    let line = get_line(src)?;

                    if line != b"-1" {
                        return Err(WireError::Parse("invalid nil reply".into()));
                    }

                    Ok(Reply::Nil)
                } else {
                    let len: usize = get_int(src)?.try_into()?;
                    let n = len + 2;

                    if src.remaining() < n {
                        return Err(WireError::Incomplete);
                    }

                    let value = String::from_utf8(src.chunk()[..len].to_vec())?;

                    // skip that number of bytes + 2 (\r\n).
                    skip(src, n)?;

                    Ok(Reply::Value(value))
                }
            }
            b'*' => {
                let len: usize = get_int(src)?.try_into()?;
                let mut entries = Vec::with_capacity(len);

                for _ in 0..len {
                    entries.push(Reply::parse(src)?);
                }

                Ok(Reply::List(entries))
            }
            actual => Err(WireError::Parse(format!(
                "invalid reply type byte `{}`",
                actual
            ))),
        }
    }
}

fn skip(src: &mut Cursor<&[u8]>, n: usize) -> Result<(), WireError> {
    if src.remaining() < n {
        return Err(WireError::Incomplete);
    }

    src.advance(n);
    Ok(())
}

fn peek_u8(src: &mut Cursor<&[u8]>) -> Result<u8, WireError> {
    if !src.has_remaining() {
        return Err(WireError::Incomplete);
    }

    Ok(src.chunk()[0])
}

fn get_u8(src: &mut Cursor<&[u8]>) -> Result<u8, WireError> {
    if !src.has_remaining() {
        return Err(WireError::Incomplete);
    }

    Ok(src.get_u8())
}

/// Read a new-line terminated signed decimal.
fn get_int(src: &mut Cursor<&[u8]>) -> Result<i64, WireError> {
    let line = get_line(src)?;

    atoi::<i64>(line).ok_or_else(|| WireError::Parse("invalid integer reply".into()))
}

/// Find a CRLF-terminated line, returning it without the terminator.
fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], WireError> {
    let start = src.position() as usize;
    // Scan to the second to last byte
    let end = src.get_ref().len().saturating_sub(1);

    for i in start..end {
        if src.get_ref()[i] == b'\r' && src.get_ref()[i + 1] == b'\n' {
            // Position the cursor *after* the \n
            src.set_position((i + 2) as u64);

            return Ok(&src.get_ref()[start..i]);
        }
    }

    Err(WireError::Incomplete)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::Reply;
    use crate::error::WireError;

    fn decode(src: &[u8]) -> Reply {
        let mut cursor = Cursor::new(src);
        Reply::check(&mut cursor).expect("check");
        assert_eq!(cursor.position() as usize, src.len());
        cursor.set_position(0);
        Reply::parse(&mut cursor).expect("parse")
    }

    #[test]
    fn decodes_status_line() {
        assert_eq!(decode(b"+OK\r\n"), Reply::Status("OK".into()));
    }

    #[test]
    fn decodes_error_line() {
        assert_eq!(
            decode(b"-ERR no such key\r\n"),
            Reply::Error("ERR no such key".into())
        );
    }

    #[test]
    fn decodes_negative_integer() {
        assert_eq!(decode(b":-1\r\n"), Reply::Int(-1));
    }

    #[test]
    fn decodes_value_and_nil() {
        assert_eq!(decode(b"$3\r\nbar\r\n"), Reply::Value("bar".into()));
        assert_eq!(decode(b"$-1\r\n"), Reply::Nil);
    }

    #[test]
    fn decodes_list_of_values() {
        assert_eq!(
            decode(b"*2\r\n$1\r\na\r\n$1\r\nb\r\n"),
            Reply::List(vec![Reply::Value("a".into()), Reply::Value("b".into())])
        );
    }

    #[test]
    fn empty_list_is_valid() {
        assert_eq!(decode(b"*0\r\n"), Reply::List(vec![]));
    }

    #[test]
    fn partial_input_reports_incomplete() {
        let mut cursor = Cursor::new(&b"$3\r\nba"[..]);
        match Reply::check(&mut cursor) {
            Err(WireError::Incomplete) => {}
            other => panic!("expected Incomplete, got {:?}", other),
        }
    }

    #[test]
    fn unknown_type_byte_is_a_parse_error() {
        let mut cursor = Cursor::new(&b"?what\r\n"[..]);
        match Reply::check(&mut cursor) {
            Err(WireError::Parse(_)) => {}
            other => panic!("expected Parse, got {:?}", other),
        }
    }
}
