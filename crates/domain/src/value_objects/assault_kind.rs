//! Assault kind value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of disruptive behavior an executor applies
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssaultKind {
    /// Suspends the call for a random duration before it proceeds
    Latency,
    /// Raises a configured error instead of letting the call proceed
    Exception,
    /// Terminates the host process
    KillApplication,
    /// Host-registered executor identified by name
    Custom(String),
}

impl AssaultKind {
    /// Stable name used for toggle derivation and metrics labels
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Latency => "latency",
            Self::Exception => "exception",
            Self::KillApplication => "kill_application",
            Self::Custom(name) => name,
        }
    }

    /// Whether applying this kind ends the process
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::KillApplication)
    }

    /// Whether this is a host-registered custom kind
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for AssaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
