//! Controller-side bridge to inspector endpoints.
//!
//! The bridge discovers target processes, attaches to one, and translates
//! typed tool calls into wire requests. Connections are transient (one
//! per request), so a crashed or restarted target never strands a pool;
//! the per-call liveness check turns a dead PID into an actionable
//! [`BridgeError::ProcessGone`] instead of a connect failure.

pub mod client;
pub mod discover;
pub mod error;

pub use client::{BridgeConfig, Controller, FindFilter, Session};
pub use discover::ProcessCandidate;
pub use error::BridgeError;
