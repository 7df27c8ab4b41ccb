use std::time::Duration;

/// How long a single connect attempt may block before the next candidate
/// address is tried.
///
/// Used if no explicit timeout is supplied to
/// [`Client::connect_with_timeout`](crate::client::Client::connect_with_timeout).
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(100);

/// Separator between the verb and each argument in an encoded request line.
///
/// The protocol performs no quoting or escaping: an argument containing
/// this character will be mis-parsed by the receiver.
pub const COMMAND_SEPARATOR: char = ' ';

/// TTL reply for a key that exists but carries no expiration.
pub const TTL_NO_EXPIRY: i64 = -1;
