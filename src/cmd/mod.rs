//! Request line construction.
//!
//! A command is a fixed verb plus an ordered sequence of string arguments,
//! serialized into a single separator-joined request line.

use crate::consts::COMMAND_SEPARATOR;

/// A normalized (verb, arguments) pair.
///
/// The encoded line performs no quoting or escaping: an argument that
/// contains [`COMMAND_SEPARATOR`] will corrupt framing on the receiving
/// side. This is an inherited protocol limitation, not something this
/// crate papers over.
#[derive(Debug)]
pub struct Command {
    verb: &'static str,
    args: Vec<String>,
}

impl Command {
    /// Create a command for `verb` with no arguments yet.
    pub fn new(verb: &'static str) -> Command {
        Command {
            verb,
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Command {
        self.args.push(arg.into());
        self
    }

    /// Append every argument in `args`, preserving order.
    pub fn args<I, S>(mut self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The verb this command was built for. Used for error context.
    pub fn verb(&self) -> &'static str {
        self.verb
    }

    /// Serialize into one request line: the verb followed by each
    /// argument, separated by [`COMMAND_SEPARATOR`].
    pub fn encode(&self) -> String {
        let mut line = String::from(self.verb);
        for arg in &self.args {
            line.push(COMMAND_SEPARATOR);
            line.push_str(arg);
        }
        line
    }
}
