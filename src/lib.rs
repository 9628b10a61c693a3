#![forbid(unsafe_code)]

//! Capture-relay coordinator library.
//!
//! Brokers a capture request from a requester to a provider over a
//! persistent WebSocket connection, correlates the provider's asynchronous
//! reply back to the waiting requester, and distributes a versioned answer
//! to subscribers via push with pull-based reconciliation.

pub mod config;
pub mod errors;
pub mod http;
pub mod models;
pub mod relay;
pub mod ws;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
