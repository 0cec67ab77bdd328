//! Server-sent event transport for live sessions.
//!
//! Routing, queueing and per-recipient hooks live in the `hub` crate; this
//! module only registers a session per request and writes its views out.

pub mod handler;
