//! Assault severity level value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Severity of the assault configuration, from 1 (rare) to 10 (every call)
///
/// The trigger probability for a watched call is `level / 10`. Values outside
/// 1..=10 are rejected when the configuration is built, never clamped at
/// decision time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// Lowest permitted level, firing roughly one call in ten
    pub const MIN: u8 = 1;
    /// Highest permitted level, firing every watched call
    pub const MAX: u8 = 10;

    /// Create a level with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLevel` when `value` is outside 1..=10.
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidLevel(value))
        }
    }

    /// The raw level value
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Probability in [0.1, 1.0] that a watched call fires
    #[must_use]
    pub fn probability(self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for Level {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
