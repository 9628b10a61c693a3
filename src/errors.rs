//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
///
/// A capture timing out is deliberately *not* represented here: it is a
/// defined outcome of a capture request
/// ([`CaptureOutcome::TimedOut`](crate::models::capture::CaptureOutcome)),
/// not a failure. Nothing in this enumeration is fatal to the process;
/// every variant is scoped to the operation that triggered it.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Registration carried a role name outside the known set.
    InvalidRole(String),
    /// No provider session was registered at capture time.
    ProviderUnavailable,
    /// A capture request is already in flight; the single slot is busy.
    AlreadyInFlight,
    /// WebSocket or HTTP transport failure.
    Transport(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::InvalidRole(role) => write!(f, "invalid role: {role}"),
            Self::ProviderUnavailable => write!(f, "provider not connected"),
            Self::AlreadyInFlight => write!(f, "capture already in flight"),
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
