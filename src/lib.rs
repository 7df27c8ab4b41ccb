//! Async client for a remote key-value store.
//!
//! Typed operations are encoded into a uniform command line, executed
//! through a pluggable [`Executor`](executor::Executor) capability, and
//! the heterogeneous replies are decoded into typed, error-aware results
//! ([`Scalar`](result::Scalar), [`Status`](result::Status),
//! [`List`](result::List)).

pub mod client;
pub mod cmd;
pub mod connection;
pub mod consts;
pub mod error;
pub mod executor;
pub mod result;
