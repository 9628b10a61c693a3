//! Peer role classification.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// A fixed category of peer with at most one live connection at a time.
///
/// The requester is deliberately not a role: it triggers captures over
/// plain HTTP request/response and never holds a persistent connection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Supplies captured payloads on command.
    Provider,
    /// Receives answer pushes and reconciles via pull.
    Subscriber,
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provider" => Ok(Self::Provider),
            "subscriber" => Ok(Self::Subscriber),
            other => Err(AppError::InvalidRole(other.to_owned())),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider => write!(f, "provider"),
            Self::Subscriber => write!(f, "subscriber"),
        }
    }
}
