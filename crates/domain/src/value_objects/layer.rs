//! Watched layer category value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// The application layer an intercepted call belongs to
///
/// The interception hook states the category when it builds the
/// [`CallSite`](crate::value_objects::CallSite); the watcher scope decides
/// per category whether calls are considered for chaos at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// View-serving controller endpoints
    Controller,
    /// REST API controller endpoints
    RestController,
    /// Business service components
    Service,
    /// Data access components
    Repository,
    /// Host-defined components outside the standard categories
    Custom,
}

impl Layer {
    /// Stable lowercase label used in logs and toggle names
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Controller => "controller",
            Self::RestController => "rest_controller",
            Self::Service => "service",
            Self::Repository => "repository",
            Self::Custom => "custom",
        }
    }

    /// All known layer categories
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Controller,
            Self::RestController,
            Self::Service,
            Self::Repository,
            Self::Custom,
        ]
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Layer::Controller.label(), "controller");
        assert_eq!(Layer::RestController.label(), "rest_controller");
        assert_eq!(Layer::Service.label(), "service");
        assert_eq!(Layer::Repository.label(), "repository");
        assert_eq!(Layer::Custom.label(), "custom");
    }

    #[test]
    fn test_display_matches_label() {
        for layer in Layer::all() {
            assert_eq!(format!("{layer}"), layer.label());
        }
    }

    #[test]
    fn test_all_has_five_distinct_entries() {
        let all = Layer::all();
        assert_eq!(all.len(), 5);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Layer::RestController).expect("serialize");
        assert_eq!(json, "\"rest_controller\"");

        let deserialized: Layer = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(deserialized, Layer::RestController);
    }
}
