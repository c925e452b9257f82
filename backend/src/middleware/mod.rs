//! Request middleware.
//!
//! Lifecycle concerns that wrap every request: correlation identifiers and
//! the request log line.

pub mod trace;

pub use trace::Trace;
