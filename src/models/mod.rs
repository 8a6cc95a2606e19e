//! Shared types used across all modules.
//!
//! Records, drafts and the small enums that config, the store and the CLI
//! all agree on live here rather than in any one consumer.

pub mod user;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use user::{Field, Gender, UserDraft, UserId, UserRecord};

/// How the store treats the remote collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// Mutations are sent to the remote collection before being applied locally.
    #[default]
    Remote,
    /// The list is fetched from the remote collection; mutations stay in memory.
    Local,
    /// No network at all.
    Offline,
}

impl StoreMode {
    /// Whether mutations stay in memory.
    pub fn is_local_only(self) -> bool {
        !matches!(self, StoreMode::Remote)
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreMode::Remote => write!(f, "remote"),
            StoreMode::Local => write!(f, "local"),
            StoreMode::Offline => write!(f, "offline"),
        }
    }
}

impl std::str::FromStr for StoreMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" => Ok(StoreMode::Remote),
            "local" => Ok(StoreMode::Local),
            "offline" => Ok(StoreMode::Offline),
            other => Err(format!(
                "unsupported mode: '{other}'. Supported: remote, local, offline"
            )),
        }
    }
}
